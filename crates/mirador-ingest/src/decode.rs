// SPDX-License-Identifier: Apache-2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Latin1,
}

impl SourceEncoding {
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Latin1 => latin1_to_string(bytes),
        }
    }
}

// ISO-8859-1 maps byte values directly onto the first 256 code points.
fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_decodes_accented_spanish_text() {
        let bytes = b"INTOXICACI\xD3N;CA\xD1AR";
        assert_eq!(
            SourceEncoding::Latin1.decode(bytes),
            "INTOXICACIÓN;CAÑAR"
        );
    }

    #[test]
    fn utf8_passes_through() {
        let text = "INTOXICACIÓN";
        assert_eq!(SourceEncoding::Utf8.decode(text.as_bytes()), text);
    }
}
