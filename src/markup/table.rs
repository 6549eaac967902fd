//! Inline markup substitution tables.
//!
//! Tag and entity names are fully delimited (`>` or `;`), so no entry is a
//! prefix of another.

/// Fixed markup tokens and the control bytes they stand for.
pub(crate) const SUBSTITUTIONS: &[(&[u8], &[u8])] = &[
    (b"<left>", b"\x1e1"),
    (b"<br>", b"\x0c"),
    (b"<blink>", b"\x071"),
    (b"</blink>", b"\x070"),
    (b"<small>", b"\x1a1"),
    (b"<normal>", b"\x1a3"),
    (b"<wide>", b"\x1d01"),
    (b"</wide>", b"\x1d00"),
    (b"<dblwide>", b"\x1d11"),
    (b"</dblwide>", b"\x1d10"),
    (b"<serif>", b"\x1d51"),
    (b"</serif>", b"\x1d50"),
    (b"<shadow>", b"\x1d71"),
    (b"</shadow>", b"\x1d70"),
    (b"&uparrow;", b"\xc4"),
    (b"&downarrow;", b"\xc5"),
    (b"&leftarrow;", b"\xc6"),
    (b"&rightarrow;", b"\xc7"),
    (b"&cent;", b"\x9b"),
    (b"&gbp;", b"\x9c"),
    (b"&yen;", b"\x9d"),
    (b"&euro;", b"\xc2"),
    (b"&pacman;", b"\xc8"),
    (b"&boat;", b"\xc9"),
    (b"&ball;", b"\xca"),
    (b"&phone;", b"\xcb"),
    (b"&heart;", b"\xcc"),
    (b"&car;", b"\xcd"),
    (b"&handicap;", b"\xce"),
    (b"&rhino;", b"\xcf"),
    (b"&mug;", b"\xd0"),
    (b"&satdish;", b"\xd1"),
    (b"&copy;", b"\xd2"),
    (b"&female;", b"\xd3"),
    (b"&male;", b"\xd4"),
    (b"&bottle;", b"\xd5"),
    (b"&disk;", b"\xd6"),
    (b"&printer;", b"\xd7"),
    (b"&note;", b"\xd8"),
    (b"&infinity;", b"\xd9"),
];

/// Opens a color change: `0x1C, 'Z'|'Y', RRGGBB`.
pub(crate) const COLOR_CONTROL: u8 = 0x1c;
/// Foreground color selector.
pub(crate) const COLOR_FOREGROUND: u8 = b'Z';
/// Shadow color selector.
pub(crate) const COLOR_SHADOW: u8 = b'Y';

/// Speed 1 maps to `0x15`, speed 5 to `0x19`.
pub(crate) const SPEED_BASE: u8 = 0x14;
/// Speed 6: no hold.
pub(crate) const SPEED_NO_HOLD: u8 = 0x09;

/// Hex pair for one color digit (`0`..`3`).
pub(crate) fn color_level(digit: u8) -> Option<[u8; 2]> {
    match digit {
        b'0' => Some(*b"00"),
        b'1' => Some(*b"40"),
        b'2' => Some(*b"80"),
        b'3' => Some(*b"C0"),
        _ => None,
    }
}

/// Control byte for a `<speedN>` digit.
pub(crate) fn speed_code(digit: u8) -> Option<u8> {
    match digit {
        b'1'..=b'5' => Some(digit - b'0' + SPEED_BASE),
        b'6' => Some(SPEED_NO_HOLD),
        _ => None,
    }
}
