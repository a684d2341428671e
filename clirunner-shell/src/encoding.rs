//! Text encodings bound to the child's redirected streams.
//!
//! The legacy command interpreter started with `/U` talks UTF-16 on its
//! redirected streams, so the cmd path decodes wide text. bash and PowerShell
//! (after its preamble) speak UTF-8 without a byte-order mark.

use std::fmt;

use crate::platform::ShellKind;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_BOM: u16 = 0xFEFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// UTF-8 without a byte-order mark.
    Utf8,
    /// Little-endian UTF-16, the native wide encoding on Windows.
    Utf16Le,
}

impl TextEncoding {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16Le => "utf-16le",
        }
    }

    /// Decode bytes read from a child stream. A leading byte-order mark is
    /// dropped and malformed sequences become U+FFFD.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => {
                let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                String::from_utf8_lossy(bytes).into_owned()
            }
            Self::Utf16Le => decode_utf16le(bytes),
        }
    }

    /// Encode text for a child stream. No byte-order mark is written.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let (pairs, remainder) = bytes.as_chunks::<2>();
    let dangling = !remainder.is_empty();
    let mut units = pairs.iter().copied().map(u16::from_le_bytes).peekable();
    if units.peek() == Some(&UTF16_BOM) {
        units.next();
    }

    let mut text: String = char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if dangling {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

/// One encoding per standard stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingAssignment {
    pub stdin: TextEncoding,
    pub stdout: TextEncoding,
    pub stderr: TextEncoding,
}

impl EncodingAssignment {
    pub const UTF8: Self = Self::uniform(TextEncoding::Utf8);
    pub const UTF16: Self = Self::uniform(TextEncoding::Utf16Le);

    pub const fn uniform(encoding: TextEncoding) -> Self {
        Self {
            stdin: encoding,
            stdout: encoding,
            stderr: encoding,
        }
    }

    /// Pick stream encodings for `shell`. `force_utf8` overrides the
    /// platform table and binds every stream to UTF-8.
    pub const fn select(shell: ShellKind, force_utf8: bool) -> Self {
        if force_utf8 {
            return Self::UTF8;
        }
        match shell {
            ShellKind::WindowsCmd => Self::UTF16,
            ShellKind::Posix | ShellKind::WindowsPowerShell => Self::UTF8,
        }
    }
}
