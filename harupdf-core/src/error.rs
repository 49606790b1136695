use std::path::PathBuf;
use thiserror::Error;

use crate::graphics::GraphicsMode;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("File processing failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open a file: {path}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Access to {0} is outside the permitted base directory")]
    PathNotAllowed(PathBuf),

    #[error("Internal error. The consistency of the data was lost: {0}")]
    Consistency(String),

    #[error("The length of the data exceeds the maximum string length: {0} bytes")]
    BinaryLengthExceeded(usize),

    #[error("Cannot create {0} handle")]
    CannotCreate(&'static str),

    #[error("Cannot set permissions and encryption mode before a password is set")]
    EncryptDictNotFound,

    #[error("Tried to set the owner password to NULL or the owner password and user password are the same")]
    EncryptInvalidPassword,

    #[error("The length of the key of encryption is invalid: {0}")]
    InvalidEncryptKeyLen(usize),

    #[error("The depth of the stack exceeded the graphics state limit")]
    ExceedGStateLimit,

    #[error("There are no graphics-states to be restored")]
    PageCannotRestoreGState,

    #[error("Invalid graphics mode: {operator} is not allowed in {mode:?}")]
    InvalidGraphicsMode {
        operator: &'static str,
        mode: GraphicsMode,
    },

    #[error("The current font is not set")]
    PageFontNotFound,

    #[error("An invalid font-size was set: {0}")]
    PageInvalidFontSize(f32),

    #[error("The specified value is not a multiple of 90: {0}")]
    PageInvalidRotateValue(i32),

    #[error("An invalid page-size was set: {0}")]
    PageInvalidSize(f32),

    #[error("The specified value is out of range: {0}")]
    PageOutOfRange(String),

    #[error("The specified value is out of range: {0}")]
    RealOutOfRange(f64),

    #[error("The length of the specified text is too big: {0} bytes")]
    StringOutOfRange(usize),

    #[error("Insufficient space for text ({printed} bytes printed)")]
    PageInsufficientSpace { printed: usize },

    #[error("An invalid value is set: {0}")]
    InvalidParameter(String),

    #[error("The function which is invalid in the present state was invoked: {0}")]
    InvalidDocumentState(String),

    #[error("Invalid operation, cannot perform the requested action: {0}")]
    InvalidOperation(String),

    #[error("An invalid document handle is set")]
    InvalidDocument,

    #[error("An invalid page-handle was specified")]
    InvalidPage,

    #[error("An invalid font-handle was specified")]
    InvalidFont,

    #[error("An invalid image-handle was set")]
    InvalidImageHandle,

    #[error("An invalid destination handle was set")]
    InvalidDestination,

    #[error("The specified annotation handle is invalid")]
    InvalidAnnotation,

    #[error("An invalid outline-handle was specified")]
    InvalidOutline,

    #[error("An invalid encoder handle is set")]
    InvalidEncoder,

    #[error("A combination between font and encoder is wrong: {font} / {encoding}")]
    InvalidEncoderType { font: String, encoding: String },

    #[error("An invalid encoding name is specified: {0}")]
    InvalidEncodingName(String),

    #[error("A font which has the specified name is not found: {0}")]
    InvalidFontName(String),

    #[error("An invalid date-time value was set: {0}")]
    InvalidDateTime(String),

    #[error("Invalid compression mode specified: {0:#x}")]
    InvalidCompressionMode(u32),

    #[error("The color_space parameter is invalid: {0}")]
    InvalidColorSpace(String),

    #[error("Bit-per-component of a image which was set as mask-image is invalid: {0}")]
    InvalidBitsPerComponent(u8),

    #[error("Unsupported or invalid image format: {0}")]
    InvalidImage(String),

    #[error("Invalid PNG image format: {0}")]
    InvalidPngImage(String),

    #[error("Unsupported or invalid JPEG format: {0}")]
    UnsupportedJpegFormat(String),

    #[error("The library is not configured to use {0}")]
    UnsupportedFunc(&'static str),

    #[error("An invalid URI was set")]
    InvalidUri,

    #[error("An invalid border-style was set: {0}")]
    AnnotInvalidBorderStyle(String),

    #[error("Cannot recognize a header of an afm file")]
    InvalidAfmHeader,

    #[error("Cannot recognize char-matrics-data of an afm file: {0}")]
    InvalidCharMetricsData(String),

    #[error("Cannot read a postscript-name from an afm file")]
    InvalidNData,

    #[error("Cannot read a width-data from an afm file: {0}")]
    InvalidWxData(String),

    #[error("Failed to parse .PFB file: {0}")]
    UnsupportedType1Font(String),

    #[error("Invalid .TTC file format: {0}")]
    InvalidTtcFile(String),

    #[error("The index parameter exceeds the number of included fonts: {index} >= {count}")]
    InvalidTtcIndex { index: u32, count: u32 },

    #[error("This font cannot be embedded (restricted by license): {0}")]
    TtfCannotEmbedFont(String),

    #[error("Unsupported or invalid ttf format (cannot find unicode cmap)")]
    TtfInvalidCmap,

    #[error("Unsupported or invalid ttf format: {0}")]
    TtfInvalidFormat(String),

    #[error("Unsupported or invalid ttf format (cannot find a necessary table): {0}")]
    TtfMissingTable(String),

    #[error("An error has occurred while executing a function of Zlib: {0}")]
    CompressionError(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

impl PdfError {
    /// Catalog entry this error corresponds to.
    pub fn status(&self) -> Status {
        match self {
            PdfError::Io(_) => Status::FileIoError,
            PdfError::FileOpen { .. } | PdfError::PathNotAllowed(_) => Status::FileOpenError,
            PdfError::Consistency(_) => Status::XrefCountErr,
            PdfError::BinaryLengthExceeded(_) => Status::BinaryLengthErr,
            PdfError::CannotCreate(_) => Status::FailedToAllocMem,
            PdfError::EncryptDictNotFound => Status::DocEncryptDictNotFound,
            PdfError::EncryptInvalidPassword => Status::EncryptInvalidPassword,
            PdfError::InvalidEncryptKeyLen(_) => Status::InvalidEncryptKeyLen,
            PdfError::ExceedGStateLimit => Status::ExceedGstateLimit,
            PdfError::PageCannotRestoreGState => Status::PageCannotRestoreGstate,
            PdfError::InvalidGraphicsMode { .. } => Status::PageInvalidGmode,
            PdfError::PageFontNotFound => Status::PageFontNotFound,
            PdfError::PageInvalidFontSize(_) => Status::PageInvalidFontSize,
            PdfError::PageInvalidRotateValue(_) => Status::PageInvalidRotateValue,
            PdfError::PageInvalidSize(_) => Status::PageInvalidSize,
            PdfError::PageOutOfRange(_) => Status::PageOutOfRange,
            PdfError::RealOutOfRange(_) => Status::RealOutOfRange,
            PdfError::StringOutOfRange(_) => Status::StringOutOfRange,
            PdfError::PageInsufficientSpace { .. } => Status::PageInsufficientSpace,
            PdfError::InvalidParameter(_) => Status::InvalidParameter,
            PdfError::InvalidDocumentState(_) => Status::InvalidDocumentState,
            PdfError::InvalidOperation(_) => Status::InvalidOperation,
            PdfError::InvalidDocument => Status::InvalidDocument,
            PdfError::InvalidPage => Status::InvalidPage,
            PdfError::InvalidFont => Status::InvalidFont,
            PdfError::InvalidImageHandle => Status::PageInvalidXobject,
            PdfError::InvalidDestination => Status::InvalidDestination,
            PdfError::InvalidAnnotation => Status::InvalidAnnotation,
            PdfError::InvalidOutline => Status::InvalidOutline,
            PdfError::InvalidEncoder => Status::InvalidEncoder,
            PdfError::InvalidEncoderType { .. } => Status::InvalidEncoderType,
            PdfError::InvalidEncodingName(_) => Status::InvalidEncodingName,
            PdfError::InvalidFontName(_) => Status::InvalidFontName,
            PdfError::InvalidDateTime(_) => Status::InvalidDateTime,
            PdfError::InvalidCompressionMode(_) => Status::InvalidCompressionMode,
            PdfError::InvalidColorSpace(_) => Status::InvalidColorSpace,
            PdfError::InvalidBitsPerComponent(_) => Status::InvalidBitPerComponent,
            PdfError::InvalidImage(_) => Status::InvalidImage,
            PdfError::InvalidPngImage(_) => Status::InvalidPngImage,
            PdfError::UnsupportedJpegFormat(_) => Status::UnsupportedJpegFormat,
            PdfError::UnsupportedFunc(_) => Status::UnsupportedFunc,
            PdfError::InvalidUri => Status::InvalidUri,
            PdfError::AnnotInvalidBorderStyle(_) => Status::AnnotInvalidBorderStyle,
            PdfError::InvalidAfmHeader => Status::InvalidAfmHeader,
            PdfError::InvalidCharMetricsData(_) => Status::InvalidCharMatricsData,
            PdfError::InvalidNData => Status::InvalidNData,
            PdfError::InvalidWxData(_) => Status::InvalidWxData,
            PdfError::UnsupportedType1Font(_) => Status::UnsupportedType1Font,
            PdfError::InvalidTtcFile(_) => Status::InvalidTtcFile,
            PdfError::InvalidTtcIndex { .. } => Status::InvalidTtcIndex,
            PdfError::TtfCannotEmbedFont(_) => Status::TtfCannotEmbeddingFont,
            PdfError::TtfInvalidCmap => Status::TtfInvalidCmap,
            PdfError::TtfInvalidFormat(_) => Status::TtfInvalidFomat,
            PdfError::TtfMissingTable(_) => Status::TtfMissingTable,
            PdfError::CompressionError(_) => Status::ZlibError,
        }
    }
}

macro_rules! status_catalog {
    ($($name:ident = $code:expr => $msg:expr,)*) => {
        /// Engine status catalog with its numeric codes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum Status {
            $($name = $code,)*
        }

        impl Status {
            pub fn from_code(code: u32) -> Option<Self> {
                match code {
                    $($code => Some(Status::$name),)*
                    _ => None,
                }
            }

            pub fn code(self) -> u32 {
                self as u32
            }

            pub fn message(self) -> &'static str {
                match self {
                    $(Status::$name => $msg,)*
                }
            }
        }
    };
}

const CONSISTENCY_LOST: &str = "Internal error. The consistency of the data was lost";

status_catalog! {
    ArrayCountErr = 0x1001 => CONSISTENCY_LOST,
    ArrayItemNotFound = 0x1002 => CONSISTENCY_LOST,
    ArrayItemUnexpectedType = 0x1003 => CONSISTENCY_LOST,
    BinaryLengthErr = 0x1004 => "The length of the data exceeds the maximum string length",
    CannotGetPallet = 0x1005 => "Cannot get a pallet data from PNG image",
    DictCountErr = 0x1007 => "The count of elements of a dictionary exceeds the maximum dictionary element count",
    DictItemNotFound = 0x1008 => CONSISTENCY_LOST,
    DictItemUnexpectedType = 0x1009 => CONSISTENCY_LOST,
    DictStreamLengthNotFound = 0x100A => CONSISTENCY_LOST,
    DocEncryptDictNotFound = 0x100B => "Cannot set permissions and encryption mode before a password is set",
    DocInvalidObject = 0x100C => CONSISTENCY_LOST,
    DuplicateRegistration = 0x100E => "Tried to register a font that has been registered",
    ExceedJwwCodeNumLimit = 0x100F => "Cannot register a character to the japanese word wrap characters list",
    EncryptInvalidPassword = 0x1011 => "Tried to set the owner password to NULL or the owner password and user password are the same",
    ErrUnknownClass = 0x1013 => CONSISTENCY_LOST,
    ExceedGstateLimit = 0x1014 => "The depth of the stack exceeded the graphics state limit",
    FailedToAllocMem = 0x1015 => "Memory allocation failed",
    FileIoError = 0x1016 => "File processing failed",
    FileOpenError = 0x1017 => "Cannot open a file",
    FontExists = 0x1019 => "Tried to load a font that has been registered",
    FontInvalidWidthsTable = 0x101A => "The format of a font-file is invalid",
    InvalidAfmHeader = 0x101B => "Cannot recognize a header of an afm file",
    InvalidAnnotation = 0x101C => "The specified annotation handle is invalid",
    InvalidBitPerComponent = 0x101E => "Bit-per-component of a image which was set as mask-image is invalid",
    InvalidCharMatricsData = 0x101F => "Cannot recognize char-matrics-data of an afm file",
    InvalidColorSpace = 0x1020 => "The color_space parameter is invalid, or color-space of the image which was set as mask-image is invalid or the function which is invalid in the present color-space was invoked",
    InvalidCompressionMode = 0x1021 => "Invalid compression mode specified",
    InvalidDateTime = 0x1022 => "An invalid date-time value was set",
    InvalidDestination = 0x1023 => "An invalid destination handle was set",
    InvalidDocument = 0x1025 => "An invalid document handle is set",
    InvalidDocumentState = 0x1026 => "The function which is invalid in the present state was invoked",
    InvalidEncoder = 0x1027 => "An invalid encoder handle is set",
    InvalidEncoderType = 0x1028 => "A combination between font and encoder is wrong",
    InvalidEncodingName = 0x102B => "An invalid encoding name is specified",
    InvalidEncryptKeyLen = 0x102C => "The length of the key of encryption is invalid",
    InvalidFontdefData = 0x102D => "An invalid font handle was set or the font format is unsupported",
    InvalidFontdefType = 0x102E => CONSISTENCY_LOST,
    InvalidFontName = 0x102F => "A font which has the specified name is not found",
    InvalidImage = 0x1030 => "Unsupported or invalid image format",
    InvalidJpegData = 0x1031 => "Unsupported or invalid image format",
    InvalidNData = 0x1032 => "Cannot read a postscript-name from an afm file",
    InvalidObject = 0x1033 => "An invalid object is set",
    InvalidObjId = 0x1034 => CONSISTENCY_LOST,
    InvalidOperation = 0x1035 => "Invalid operation, cannot perform the requested action",
    InvalidOutline = 0x1036 => "An invalid outline-handle was specified",
    InvalidPage = 0x1037 => "An invalid page-handle was specified",
    InvalidPages = 0x1038 => "An invalid pages-handle was specified",
    InvalidParameter = 0x1039 => "An invalid value is set",
    InvalidPngImage = 0x103B => "Invalid PNG image format",
    InvalidStream = 0x103C => CONSISTENCY_LOST,
    MissingFileNameEntry = 0x103D => "Internal error. The file name entry for delayed loading is missing",
    InvalidTtcFile = 0x103F => "Invalid .TTC file format",
    InvalidTtcIndex = 0x1040 => "The index parameter exceeds the number of included fonts",
    InvalidWxData = 0x1041 => "Cannot read a width-data from an afm file",
    ItemNotFound = 0x1042 => CONSISTENCY_LOST,
    LibpngError = 0x1043 => "An error has returned from the PNG decoder while loading an image",
    NameInvalidValue = 0x1044 => CONSISTENCY_LOST,
    NameOutOfRange = 0x1045 => CONSISTENCY_LOST,
    PagesMissingKidsEntry = 0x1049 => CONSISTENCY_LOST,
    PageCannotFindObject = 0x104A => CONSISTENCY_LOST,
    PageCannotGetRootPages = 0x104B => CONSISTENCY_LOST,
    PageCannotRestoreGstate = 0x104C => "There are no graphics-states to be restored",
    PageCannotSetParent = 0x104D => CONSISTENCY_LOST,
    PageFontNotFound = 0x104E => "The current font is not set",
    PageInvalidFont = 0x104F => "An invalid font-handle was specified",
    PageInvalidFontSize = 0x1050 => "An invalid font-size was set",
    PageInvalidGmode = 0x1051 => "Invalid graphics mode",
    PageInvalidIndex = 0x1052 => CONSISTENCY_LOST,
    PageInvalidRotateValue = 0x1053 => "The specified value is not a multiple of 90",
    PageInvalidSize = 0x1054 => "An invalid page-size was set",
    PageInvalidXobject = 0x1055 => "An invalid image-handle was set",
    PageOutOfRange = 0x1056 => "The specified value is out of range",
    RealOutOfRange = 0x1057 => "The specified value is out of range",
    StreamEof = 0x1058 => "Unexpected EOF marker was detected",
    StreamReadlnContinue = 0x1059 => CONSISTENCY_LOST,
    StringOutOfRange = 0x105B => "The length of the specified text is too big",
    ThisFuncWasSkipped = 0x105C => "The execution of a function was skipped because of other errors",
    TtfCannotEmbeddingFont = 0x105D => "This font cannot be embedded (restricted by license)",
    TtfInvalidCmap = 0x105E => "Unsupported or invalid ttf format (cannot find unicode cmap)",
    TtfInvalidFomat = 0x105F => "Unsupported or invalid ttf format",
    TtfMissingTable = 0x1060 => "Unsupported or invalid ttf format (cannot find a necessary table)",
    UnsupportedFontType = 0x1061 => CONSISTENCY_LOST,
    UnsupportedFunc = 0x1062 => "The library is not configured to use PNGLIB or internal error occured",
    UnsupportedJpegFormat = 0x1063 => "Unsupported or invalid JPEG format",
    UnsupportedType1Font = 0x1064 => "Failed to parse .PFB file",
    XrefCountErr = 0x1065 => CONSISTENCY_LOST,
    ZlibError = 0x1066 => "An error has occurred while executing a function of Zlib",
    InvalidPageIndex = 0x1067 => "An error returned from Zlib",
    InvalidUri = 0x1068 => "An invalid URI was set",
    PageLayoutOutOfRange = 0x1069 => "The specified page layout is out of range",
    PageModeOutOfRange = 0x1070 => "The specified page mode is out of range",
    PageNumStyleOutOfRange = 0x1071 => "The specified page numbering style is out of range",
    AnnotInvalidIcon = 0x1072 => "An invalid icon was set",
    AnnotInvalidBorderStyle = 0x1073 => "An invalid border-style was set",
    PageInvalidDirection = 0x1074 => "An invalid page-direction was set",
    InvalidFont = 0x1075 => "An invalid font-handle was specified",
    PageInsufficientSpace = 0x1076 => "Insufficient space for text",
}

/// Message for a raw status code; unmapped codes get a generic message.
pub fn status_message(code: u32) -> &'static str {
    match code {
        0 => "No error",
        _ => Status::from_code(code)
            .map(Status::message)
            .unwrap_or("Unknown error occurred"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_pdf_error_display() {
        let error = PdfError::EncryptInvalidPassword;
        assert_eq!(
            error.to_string(),
            "Tried to set the owner password to NULL or the owner password and user password are the same"
        );
    }

    #[test]
    fn test_graphics_mode_error_display() {
        let error = PdfError::InvalidGraphicsMode {
            operator: "Tj",
            mode: GraphicsMode::PathObject,
        };
        let message = error.to_string();
        assert!(message.starts_with("Invalid graphics mode"));
        assert!(message.contains("Tj"));
        assert!(message.contains("PathObject"));
    }

    #[test]
    fn test_pdf_error_from_io_error() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let pdf_error = PdfError::from(io_error);

        match pdf_error {
            PdfError::Io(ref err) => {
                assert_eq!(err.kind(), ErrorKind::NotFound);
            }
            _ => panic!("Expected IO error variant"),
        }
        assert_eq!(pdf_error.status(), Status::FileIoError);
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(Status::from_code(0x1051), Some(Status::PageInvalidGmode));
        assert_eq!(Status::PageInvalidGmode.code(), 0x1051);
        assert_eq!(Status::PageInvalidGmode.message(), "Invalid graphics mode");
    }

    #[test]
    fn test_status_message_unknown_code() {
        assert_eq!(status_message(0), "No error");
        assert_eq!(status_message(0xDEAD), "Unknown error occurred");
        assert_eq!(
            status_message(0x1040),
            "The index parameter exceeds the number of included fonts"
        );
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = vec![
            (PdfError::InvalidTtcIndex { index: 3, count: 2 }, Status::InvalidTtcIndex),
            (PdfError::PageFontNotFound, Status::PageFontNotFound),
            (PdfError::InvalidCompressionMode(0x80), Status::InvalidCompressionMode),
            (PdfError::BinaryLengthExceeded(70_000), Status::BinaryLengthErr),
            (PdfError::Consistency("dangling".into()), Status::XrefCountErr),
        ];

        for (error, status) in cases {
            assert_eq!(error.status(), status, "{error}");
            assert!(!error.to_string().is_empty());
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PdfError>();
    }
}
