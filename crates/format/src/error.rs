use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("file is too short for a trace header ({0} bytes)")]
    TruncatedHeader(usize),
    #[error("bad magic {0:?}, not a proflog trace")]
    BadMagic([u8; 4]),
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u16),
    #[error("record at offset {offset} is truncated")]
    TruncatedRecord { offset: usize },
    #[error("record at offset {offset} has a {len}-byte payload, minimum is {min}")]
    PayloadTooShort { offset: usize, len: usize, min: usize },
    #[error("record at offset {offset} ends ({end}) before it begins ({begin})")]
    EndBeforeBegin { offset: usize, begin: u64, end: u64 },
    #[error("record at offset {offset} is on thread 0, which is not a valid thread id")]
    InvalidThread { offset: usize },
    #[error("record at offset {offset} has unknown kind {kind}")]
    UnknownKind { offset: usize, kind: u8 },
    #[error("event at offset {offset} has a non-zero duration")]
    EventWithDuration { offset: usize },
    #[error("record at offset {offset} has no NUL-terminated name")]
    MissingNameTerminator { offset: usize },
    #[error("record at offset {offset} has a name that is not valid UTF-8")]
    InvalidName { offset: usize },
    #[error("name and arguments of {0:?} do not fit a single record")]
    RecordTooLarge(String),
    #[error("name {0:?} contains a NUL byte")]
    NulInName(String),
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}
