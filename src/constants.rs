/// 默认帧宽度 (像素)。
pub const DEFAULT_WIDTH: u32 = 1920;

/// 默认帧高度 (像素)。
pub const DEFAULT_HEIGHT: u32 = 1080;

/// 追加在文件比特之后的结束标记。
/// 25 个 ASCII 字符，每个字符 8 bits (MSB 在前)，共 200 bits。
pub const DELIMITER_MARKER: &str = "HELLO MY NAME IS ALFREDO!";

/// 每个字节展开成的比特数。
pub const BITS_PER_BYTE: usize = 8;

/// 编码输出的视频文件名，位于 `--output` 目录下。
pub const ENCODED_VIDEO_NAME: &str = "file.mp4";

/// 解码输出的文件名 (不含扩展名)，扩展名由内容嗅探决定。
pub const DECODED_FILE_STEM: &str = "file";

/// 编码阶段暂存帧的文件名前缀。
pub const ENCODED_FRAME_PREFIX: &str = "encoded_";

/// 解码阶段从视频中拆出的帧的文件名前缀。
pub const DECODED_FRAME_PREFIX: &str = "decoded_";

/// 暂存帧使用的无损图像格式。
pub const FRAME_EXTENSION: &str = "png";

/// 多帧视频的帧率：每 5 秒一帧。
pub const MULTI_FRAME_RATE: &str = "1/5";

/// 单帧视频的时长 (秒)，即每秒一帧。
pub const SINGLE_FRAME_SECONDS: &str = "1";
