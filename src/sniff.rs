//! # 文件类型嗅探模块
//!
//! 解码得到的字节没有文件名，只能根据开头的魔数猜测类型，从而为输出文件选一个扩展名。

/// 嗅探结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileKind {
    pub mime: &'static str,
    pub extension: &'static str,
}

impl FileKind {
    const fn new(mime: &'static str, extension: &'static str) -> Self {
        Self { mime, extension }
    }
}

pub const EMPTY: FileKind = FileKind::new("application/x-empty", "bin");
pub const TEXT: FileKind = FileKind::new("text/plain", "txt");
pub const BINARY: FileKind = FileKind::new("application/octet-stream", "bin");
const BMP: FileKind = FileKind::new("image/bmp", "bmp");

/// 不超过这个长度的魔数容易与普通文本的开头重合，需先排除文本。
const WEAK_SIGNATURE_LEN: usize = 3;

/// BITMAPCOREHEADER、BITMAPINFOHEADER 及其扩展版本的 DIB 头长度。
const BMP_DIB_HEADER_SIZES: [u32; 5] = [12, 40, 56, 108, 124];

/// 魔数签名：`offset` 处出现 `pattern` 即判定为 `kind`。
struct Signature {
    pattern: &'static [u8],
    offset: usize,
    kind: FileKind,
}

impl Signature {
    fn matches(&self, bytes: &[u8]) -> bool {
        bytes
            .get(self.offset..self.offset + self.pattern.len())
            .is_some_and(|window| window == self.pattern)
    }
}

const fn sig(
    pattern: &'static [u8],
    offset: usize,
    mime: &'static str,
    extension: &'static str,
) -> Signature {
    Signature {
        pattern,
        offset,
        kind: FileKind::new(mime, extension),
    }
}

// RIFF 容器需要结合偏移 8 处的子类型判断，因此单独处理
const SIGNATURES: &[Signature] = &[
    // 图像
    sig(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], 0, "image/png", "png"),
    sig(&[0xFF, 0xD8, 0xFF], 0, "image/jpeg", "jpg"),
    sig(b"GIF87a", 0, "image/gif", "gif"),
    sig(b"GIF89a", 0, "image/gif", "gif"),
    sig(&[0x49, 0x49, 0x2A, 0x00], 0, "image/tiff", "tiff"),
    sig(&[0x4D, 0x4D, 0x00, 0x2A], 0, "image/tiff", "tiff"),
    // 文档与归档
    sig(b"%PDF", 0, "application/pdf", "pdf"),
    sig(&[0x50, 0x4B, 0x03, 0x04], 0, "application/zip", "zip"),
    sig(&[0x1F, 0x8B], 0, "application/gzip", "gz"),
    sig(b"BZh", 0, "application/x-bzip2", "bz2"),
    sig(&[0xFD, b'7', b'z', b'X', b'Z', 0x00], 0, "application/x-xz", "xz"),
    sig(&[b'7', b'z', 0xBC, 0xAF, 0x27, 0x1C], 0, "application/x-7z-compressed", "7z"),
    sig(&[0x28, 0xB5, 0x2F, 0xFD], 0, "application/zstd", "zst"),
    sig(b"ustar", 257, "application/x-tar", "tar"),
    // 音视频
    sig(b"ftyp", 4, "video/mp4", "mp4"),
    sig(&[0x1A, 0x45, 0xDF, 0xA3], 0, "video/x-matroska", "mkv"),
    sig(b"OggS", 0, "audio/ogg", "ogg"),
    sig(b"fLaC", 0, "audio/flac", "flac"),
    sig(b"ID3", 0, "audio/mpeg", "mp3"),
    // 可执行文件
    sig(&[0x00, b'a', b's', b'm'], 0, "application/wasm", "wasm"),
    sig(&[0x7F, b'E', b'L', b'F'], 0, "application/x-executable", "elf"),
];

const RIFF_KINDS: &[(&[u8], FileKind)] = &[
    (b"WEBP", FileKind::new("image/webp", "webp")),
    (b"WAVE", FileKind::new("audio/wav", "wav")),
    (b"AVI ", FileKind::new("video/x-msvideo", "avi")),
];

/// 根据内容猜测文件类型。
///
/// 依次尝试 RIFF 子类型、BMP 头、魔数表和 UTF-8 文本，都不匹配时返回 `application/octet-stream`。
/// 三字节及以下的短魔数只在内容不是文本时才生效。
pub fn sniff(bytes: &[u8]) -> FileKind {
    if bytes.is_empty() {
        return EMPTY;
    }

    let riff_subtype = bytes.starts_with(b"RIFF").then(|| bytes.get(8..12)).flatten();
    if let Some(kind) = riff_subtype.and_then(riff_kind) {
        return kind;
    }

    if is_bmp(bytes) {
        return BMP;
    }

    let text = is_text(bytes);
    if let Some(signature) = SIGNATURES
        .iter()
        .find(|s| s.matches(bytes) && !(text && s.pattern.len() <= WEAK_SIGNATURE_LEN))
    {
        return signature.kind;
    }

    if text { TEXT } else { BINARY }
}

/// "BM" 之后还要求保留字段 (偏移 6..10) 为零，且偏移 14 处是已知的 DIB 头长度。
fn is_bmp(bytes: &[u8]) -> bool {
    if !bytes.starts_with(b"BM") || bytes.len() < 18 {
        return false;
    }
    let dib_size = u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]);
    bytes[6..10].iter().all(|&b| b == 0) && BMP_DIB_HEADER_SIZES.contains(&dib_size)
}

fn riff_kind(subtype: &[u8]) -> Option<FileKind> {
    RIFF_KINDS
        .iter()
        .find(|(tag, _)| *tag == subtype)
        .map(|(_, kind)| *kind)
}

fn is_text(bytes: &[u8]) -> bool {
    std::str::from_utf8(bytes).is_ok_and(|text| {
        text.chars()
            .all(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t' | '\x0C'))
    })
}
