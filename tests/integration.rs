//! Integration tests for signwire.
//!
//! These tests compile configs and run them through a session over a
//! scripted transport.

use std::cell::RefCell;
use std::time::Duration;

use signwire::protocol::{SEQUENCE_FOOTER, SEQUENCE_HEADER, STRING_REFERENCE};
use signwire::transport::{MockEvent, MockTransport, SendOutcome};
use signwire::{
    Compiler, CompilerOptions, DeviceProfile, FrameList, Result, RunMode, SessionBuilder,
    SessionState, SignError, SignSession,
};

fn session(mock: MockTransport) -> SignSession<MockTransport> {
    SessionBuilder::new()
        .packet_delay(Duration::ZERO)
        .build(mock)
}

/// Packet bodies (without the `03` footer), skipping bare packet headers and
/// the sequence header/footer.
fn packet_bodies(mock: &MockTransport) -> Vec<Vec<u8>> {
    mock.sends()
        .filter(|data| data.len() > 1 && data.ends_with(&[0x03]))
        .map(|data| data[..data.len() - 1].to_vec())
        .collect()
}

/// `txt a Hello` in initialize mode: header, memconfig, text, run sequence,
/// footer, each packet framed by `02 .. 03`.
#[test]
fn test_txt_hello_initialize_order() {
    let frames = Compiler::new().compile("txt a Hello").unwrap();
    let mut s = session(MockTransport::new());
    s.run(&frames, RunMode::Initialize).unwrap();

    let expected: [&[u8]; 8] = [
        &SEQUENCE_HEADER,
        &[0x02],
        b"E$ AL0080FF00\x03",
        &[0x02],
        b"A \x1b0aHello\x03",
        &[0x02],
        b"E.SU \x03",
        &SEQUENCE_FOOTER,
    ];
    let sends: Vec<&[u8]> = s.transport().sends().collect();
    assert_eq!(sends, expected);
    assert_eq!(s.transport().reset_count(), 0);
    assert_eq!(s.state(), SessionState::SequenceClosed);
}

/// A failed first header, a good reset and a good retry carry on normally.
#[test]
fn test_reset_retry_recovers() {
    let frames = Compiler::new().compile("txt a Hello").unwrap();
    let mock = MockTransport::new().with_outcomes([SendOutcome::Fail]);
    let mut s = session(mock);
    s.run(&frames, RunMode::Initialize).unwrap();

    let events = s.transport().events();
    assert!(matches!(&events[0], MockEvent::Send { data, .. } if data[..] == SEQUENCE_HEADER));
    assert_eq!(events[1], MockEvent::Reset);
    assert!(matches!(&events[2], MockEvent::Send { data, .. } if data[..] == SEQUENCE_HEADER));
    assert_eq!(s.transport().sends().count(), 9);
    assert_eq!(s.state(), SessionState::SequenceClosed);
}

/// Two failed headers in a row abort before anything else is sent.
#[test]
fn test_double_failure_aborts() {
    let frames = Compiler::new().compile("txt a Hello").unwrap();
    let mock = MockTransport::new().with_outcomes([SendOutcome::Fail, SendOutcome::Fail]);
    let mut s = session(mock);
    let err = s.run(&frames, RunMode::Initialize).unwrap_err();

    assert!(matches!(err, SignError::Device { .. }));
    assert!(!err.is_compile_error());
    assert_eq!(s.transport().events().len(), 3);
    assert_eq!(s.state(), SessionState::Aborted);
}

/// Update mode resends string fragments and leaves text frames alone.
#[test]
fn test_update_skips_text_frames() {
    let compiler =
        Compiler::with_runner(|_: &str| -> Result<Vec<u8>> { Ok(b"72F sunny".to_vec()) });
    let frames = compiler.compile("txt a Weather:\ncmd b weather").unwrap();
    assert_eq!(frames.len(), 6);

    let mut s = session(MockTransport::new());
    s.run(&frames, RunMode::Update).unwrap();

    let bodies = packet_bodies(s.transport());
    assert_eq!(
        bodies,
        vec![
            b"G!72F sunny".to_vec(),
            b"G\"".to_vec(),
            b"G#".to_vec(),
            b"G$".to_vec(),
        ]
    );
}

/// An update compiled from different command output only writes to labels
/// the initialize run set up as STRING files.
#[test]
fn test_update_targets_initialized_string_labels() {
    let source = "cmd a clock\ntxt b static";
    let short = Compiler::with_runner(|_: &str| -> Result<Vec<u8>> { Ok(b"short".to_vec()) })
        .compile(source)
        .unwrap();
    let long =
        Compiler::with_runner(|_: &str| -> Result<Vec<u8>> { Ok("v".repeat(300).into_bytes()) })
            .compile(source)
            .unwrap();

    let mut init = session(MockTransport::new());
    init.run(&short, RunMode::Initialize).unwrap();
    let memconfig = &packet_bodies(init.transport())[0];
    let string_labels: Vec<u8> = memconfig[2..]
        .chunks(11)
        .filter(|spec| spec[1] == b'B')
        .map(|spec| spec[0])
        .collect();
    assert_eq!(string_labels, vec![0x20, 0x21, 0x22, 0x23]);

    let mut update = session(MockTransport::new());
    update.run(&long, RunMode::Update).unwrap();
    let updated: Vec<u8> = packet_bodies(update.transport())
        .iter()
        .map(|body| {
            assert_eq!(body[0], b'G');
            body[1]
        })
        .collect();
    assert_eq!(updated, string_labels);
}

/// A `cmd` line: a full group of fragments, then a text frame referencing
/// them, and the memconfig reserving 125 bytes per fragment.
#[test]
fn test_cmd_end_to_end() {
    let output = "x".repeat(200);
    let compiler = Compiler::with_runner(move |_: &str| -> Result<Vec<u8>> {
        Ok(output.clone().into_bytes())
    });
    let frames = compiler.compile("cmd nS status").unwrap();

    assert_eq!(frames.string_fragment_count(), 4);
    let text = frames.get(4).unwrap();
    assert_eq!(
        text.payload(),
        &[
            STRING_REFERENCE, 0x20, STRING_REFERENCE, 0x21,
            STRING_REFERENCE, 0x22, STRING_REFERENCE, 0x23,
        ]
    );

    let mut s = session(MockTransport::new());
    s.run(&frames, RunMode::Initialize).unwrap();

    let bodies = packet_bodies(s.transport());
    assert_eq!(bodies.len(), 7);
    assert_eq!(
        bodies[0],
        b"E$ BL007D0000!BL007D0000\"BL007D0000#BL007D0000$AL0080FF00".to_vec()
    );
    let fragment_lens: Vec<usize> = bodies[1..5].iter().map(Vec::len).collect();
    assert_eq!(fragment_lens, vec![2 + 125, 2 + 75, 2, 2]);
    assert_eq!(bodies[5], b"A$\x1b0nS\x10 \x10!\x10\"\x10#".to_vec());
    // only the text frame is in the display order
    assert_eq!(bodies[6], b"E.SU$".to_vec());
}

/// The command runner sees each command once, in config order.
#[test]
fn test_commands_run_in_order() {
    let seen = RefCell::new(Vec::new());
    let compiler = Compiler::with_runner(|cmd: &str| -> Result<Vec<u8>> {
        seen.borrow_mut().push(cmd.to_string());
        Ok(Vec::new())
    });
    compiler
        .compile("cmd a first\ntxt b middle\ncmd c second --flag")
        .unwrap();
    assert_eq!(*seen.borrow(), vec!["first", "second --flag"]);
}

/// Labels stay unique and ascending across a mixed config.
#[test]
fn test_labels_unique_across_config() {
    let compiler =
        Compiler::with_runner(|_: &str| -> Result<Vec<u8>> { Ok("y".repeat(400).into_bytes()) });
    let frames = compiler
        .compile("txt a one\ncmd b big\ntxt c two\ncmd d big\n")
        .unwrap();

    let labels: Vec<u8> = frames.labels().collect();
    assert!(labels.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(labels.len(), 1 + 5 + 1 + 5);
}

/// A profile's label limit bounds the compile.
#[test]
fn test_profile_label_limit() {
    let profile = DeviceProfile::from_json_str(r#"{"label_limit": 3}"#).unwrap();
    let compiler = Compiler::new().options(CompilerOptions::from_profile(&profile));

    assert!(compiler.compile("txt a 1\ntxt a 2\ntxt a 3").is_ok());
    let err = compiler
        .compile("txt a 1\ntxt a 2\ntxt a 3\ntxt a 4")
        .unwrap_err();
    assert!(matches!(err, SignError::Capacity { max_labels: 3, .. }));
}

/// Compile errors stop before anything reaches the transport.
#[test]
fn test_syntax_error_reports_line() {
    let err = Compiler::new()
        .compile("txt a fine\n\nwat\n")
        .unwrap_err();
    assert!(err.is_compile_error());
    assert_eq!(err.to_string(), "Syntax error, line 3: Unknown command.");
}

/// Nothing to send means no transport traffic at all.
#[test]
fn test_empty_config_sends_nothing() {
    let frames: FrameList = Compiler::new().compile("# only a comment\n").unwrap();
    let mut s = session(MockTransport::new());
    s.run(&frames, RunMode::Initialize).unwrap();
    assert!(s.transport().events().is_empty());
}
