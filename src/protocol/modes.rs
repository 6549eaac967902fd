//! Display mode codes.
//!
//! One-character modes are plain transitions. Two-character modes start with
//! `n` and select a special effect or canned animation, which is why a `txt`
//! line with such a mode may omit its text.

/// Leading character of two-character special modes.
pub const SPECIAL_MODE_PREFIX: u8 = b'n';

const TRANSITIONS: &[(u8, &str)] = &[
    (b'a', "rotate"),
    (b'b', "hold"),
    (b'c', "flash"),
    (b'e', "rollup"),
    (b'f', "rolldn"),
    (b'g', "rolleft"),
    (b'h', "rollright"),
    (b'i', "wipeup"),
    (b'j', "wipedn"),
    (b'k', "wipeleft"),
    (b'l', "wiperight"),
    (b'm', "scroll"),
    (b'o', "automode"),
    (b'p', "rollin"),
    (b'q', "rollout"),
    (b'r', "wipein"),
    (b's', "wipeout"),
    (b't', "comprotate"),
];

const SPECIALS: &[(u8, &str)] = &[
    (b'0', "twinkle"),
    (b'1', "sparkle"),
    (b'2', "snow"),
    (b'3', "interlock"),
    (b'4', "switch"),
    (b'5', "cyclecolor"),
    (b'6', "spray"),
    (b'7', "starburst"),
    (b'8', "welcome"),
    (b'9', "sale"),
    (b'A', "newsflash"),
    (b'B', "happy4th"),
    (b'C', "cyclecolor"),
    (b'S', "thankyou"),
    (b'U', "nosmoking"),
    (b'V', "dontdrink"),
    (b'W', "fish"),
    (b'X', "fireworks"),
    (b'Y', "xmas"),
    (b'Z', "smile"),
];

/// Human-readable name of a mode, if it is a documented one.
///
/// `special` is the second character of an `n` mode (upper-case).
pub fn mode_name(mode: u8, special: Option<u8>) -> Option<&'static str> {
    let (table, key) = match special {
        Some(s) if mode == SPECIAL_MODE_PREFIX => (SPECIALS, s),
        Some(_) => return None,
        None => (TRANSITIONS, mode),
    };
    table.iter().find(|(code, _)| *code == key).map(|(_, name)| *name)
}
