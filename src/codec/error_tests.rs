//! Unit tests for packet error classification.

use std::{error::Error as StdError, fmt, io};

use super::{EofError, PacketError, ProtocolError, TransportStage, is_transport_error};

#[derive(Debug)]
struct Wrapper(PacketError);

impl fmt::Display for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("query failed") }
}

impl StdError for Wrapper {
    fn source(&self) -> Option<&(dyn StdError + 'static)> { Some(&self.0) }
}

fn transport(stage: TransportStage) -> PacketError {
    PacketError::transport(stage, io::Error::other("connection reset"))
}

#[test]
fn transport_errors_are_classified() {
    let err = transport(TransportStage::HeaderRead);
    assert!(err.is_transport());
    assert!(!err.is_protocol());
    assert_eq!(err.error_type(), "transport");
    assert_eq!(err.stage(), Some(TransportStage::HeaderRead));
}

#[test]
fn protocol_errors_are_not_transport() {
    let err = PacketError::from(ProtocolError::SequenceMismatch {
        expected: 5,
        actual: 6,
    });
    assert!(err.is_protocol());
    assert!(!err.is_transport());
    assert_eq!(err.error_type(), "protocol");
    assert_eq!(err.stage(), None);
}

#[test]
fn predicate_sees_through_wrappers() {
    let wrapped = Wrapper(transport(TransportStage::BodyWrite));
    assert!(is_transport_error(&wrapped));

    let wrapped = Wrapper(PacketError::from(ProtocolError::InvalidPayloadLength {
        length: 0,
    }));
    assert!(!is_transport_error(&wrapped));
}

#[test]
fn predicate_sees_through_io_conversion() {
    let io_err: io::Error = transport(TransportStage::Flush).into();
    assert_eq!(io_err.kind(), io::ErrorKind::Other);
    assert!(is_transport_error(&io_err));

    let io_err: io::Error = PacketError::from(ProtocolError::MissingHeaderSpace { len: 2 }).into();
    assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
    assert!(!is_transport_error(&io_err));
}

#[test]
fn predicate_rejects_unrelated_errors() {
    assert!(!is_transport_error(&io::Error::other("unrelated")));
}

#[test]
fn clean_close_is_detectable() {
    let err = PacketError::transport(TransportStage::HeaderRead, EofError::CleanClose.into());
    assert!(err.is_clean_close());
    assert!(err.is_transport());

    let err = PacketError::transport(
        TransportStage::HeaderRead,
        EofError::MidHeader {
            bytes_received: 2,
            header_size: 4,
        }
        .into(),
    );
    assert!(!err.is_clean_close());
    assert_eq!(
        err.eof(),
        Some(&EofError::MidHeader {
            bytes_received: 2,
            header_size: 4,
        })
    );
}

#[test]
fn transport_display_names_stage_and_cause() {
    let err = transport(TransportStage::BodyRead);
    assert_eq!(
        err.to_string(),
        "failed to read packet body: connection reset"
    );
}

#[test]
fn protocol_display_includes_details() {
    let err = PacketError::from(ProtocolError::SequenceMismatch {
        expected: 5,
        actual: 6,
    });
    assert_eq!(err.to_string(), "protocol error: invalid sequence 6 != 5");
}

#[test]
fn mid_body_display_reports_counts() {
    let err = EofError::MidBody {
        bytes_received: 10,
        expected: 20,
    };
    let display = err.to_string();
    assert!(display.contains("10"));
    assert!(display.contains("20"));
}
