/// Limits applied symmetrically by the writer and the reader.
///
/// The writer refuses to produce anything the reader would refuse to read,
/// so a buffer produced under one config always decodes under the same config.
/// Going over a limit is [`LimitExceeded`](crate::CodecError::LimitExceeded) when encoding
/// and [`Format`](crate::CodecError::Format) when decoding.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CodecConfig {
    /// Maximum nesting of composite nodes.
    ///
    /// Every shared pointer, record, `Some`, sequence, map and variant on the path
    /// from the root costs one level. A linked list of
    /// `Rc<RefCell<Link>>` with a `next: Option<Rc<RefCell<Link>>>` field thus spends
    /// three levels per link, and the default depth admits 85 links.
    /// Raise this for long chains, or store them flat in a `Vec`.
    pub max_depth: usize,
    /// Maximum length of a string or byte buffer, and maximum member count of a sequence or map.
    pub max_len: u32,
}

impl CodecConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 256;
    pub const DEFAULT_MAX_LEN: u32 = 16 << 20;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_len(mut self, max_len: u32) -> Self {
        self.max_len = max_len;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_len: Self::DEFAULT_MAX_LEN,
        }
    }
}
