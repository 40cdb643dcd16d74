//! # フォーマット判定
//!
//! 先頭のマジックバイトだけを見て画像フォーマットを判定する。
//! クライアントが宣言したContent-Typeはここでは一切参照しない。

use pixdrop_types::ImageKind;

/// JPEGのSOIマーカーに続く次のマーカーの先頭バイトまで。
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// GIFのシグネチャ（バージョン部を除く）
const GIF_SIGNATURE: &[u8] = b"GIF";

/// 受け付けるGIFバージョン
const GIF_VERSIONS: [&[u8]; 2] = [b"87a", b"89a"];

/// マジックバイト判定の結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffedFormat {
    Jpeg,
    Gif,
    /// 未対応フォーマット、または途中で切れたヘッダ
    Unknown,
}

impl SniffedFormat {
    /// 受け付け可能な種別に変換する。`Unknown` は `None`。
    pub fn image_kind(self) -> Option<ImageKind> {
        match self {
            SniffedFormat::Jpeg => Some(ImageKind::Jpeg),
            SniffedFormat::Gif => Some(ImageKind::Gif),
            SniffedFormat::Unknown => None,
        }
    }
}

/// バイト列の先頭からフォーマットを判定する。
pub fn sniff_format(data: &[u8]) -> SniffedFormat {
    if data.starts_with(JPEG_MAGIC) {
        return SniffedFormat::Jpeg;
    }

    if data.len() >= 6 && data.starts_with(GIF_SIGNATURE) {
        let version = &data[3..6];
        if GIF_VERSIONS.contains(&version) {
            return SniffedFormat::Gif;
        }
    }

    SniffedFormat::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_jpeg_variants() {
        // JFIF / EXIF / 生のDQTで始まるJPEG
        assert_eq!(sniff_format(b"\xff\xd8\xff\xe0\x00\x10JFIF\x00"), SniffedFormat::Jpeg);
        assert_eq!(sniff_format(b"\xff\xd8\xff\xe1\x00\x22Exif\x00\x00"), SniffedFormat::Jpeg);
        assert_eq!(sniff_format(b"\xff\xd8\xff\xdb"), SniffedFormat::Jpeg);
    }

    #[test]
    fn test_sniff_gif_versions() {
        assert_eq!(sniff_format(b"GIF87a\x01\x00\x01\x00"), SniffedFormat::Gif);
        assert_eq!(sniff_format(b"GIF89a\x01\x00\x01\x00"), SniffedFormat::Gif);
        assert_eq!(sniff_format(b"GIF88a\x01\x00\x01\x00"), SniffedFormat::Unknown);
    }

    #[test]
    fn test_sniff_truncated_headers() {
        assert_eq!(sniff_format(b""), SniffedFormat::Unknown);
        assert_eq!(sniff_format(b"\xff"), SniffedFormat::Unknown);
        assert_eq!(sniff_format(b"\xff\xd8"), SniffedFormat::Unknown);
        assert_eq!(sniff_format(b"GIF"), SniffedFormat::Unknown);
        assert_eq!(sniff_format(b"GIF89"), SniffedFormat::Unknown);
    }

    #[test]
    fn test_sniff_other_formats_are_unknown() {
        assert_eq!(sniff_format(b"\x89PNG\r\n\x1a\n\x00\x00"), SniffedFormat::Unknown);
        assert_eq!(sniff_format(b"RIFF\x00\x00\x00\x00WEBPVP8 "), SniffedFormat::Unknown);
        assert_eq!(sniff_format(b"BM\x00\x00\x00\x00"), SniffedFormat::Unknown);
        assert_eq!(sniff_format(b"<html></html>"), SniffedFormat::Unknown);
        // GIFシグネチャが先頭以外にあっても判定しない
        assert_eq!(sniff_format(b"xxGIF89a"), SniffedFormat::Unknown);
    }

    /// 任意のバイト列でパニックせず、先頭が一致しなければUnknownになる
    #[test]
    fn test_sniff_arbitrary_bytes() {
        for seed in 0u8..=255 {
            let data: Vec<u8> = (0..16u8).map(|i| seed.wrapping_mul(31).wrapping_add(i)).collect();
            let expected = if data.starts_with(JPEG_MAGIC) {
                SniffedFormat::Jpeg
            } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
                SniffedFormat::Gif
            } else {
                SniffedFormat::Unknown
            };
            assert_eq!(sniff_format(&data), expected);
        }
    }

    #[test]
    fn test_image_kind_mapping() {
        assert_eq!(SniffedFormat::Jpeg.image_kind(), Some(ImageKind::Jpeg));
        assert_eq!(SniffedFormat::Gif.image_kind(), Some(ImageKind::Gif));
        assert_eq!(SniffedFormat::Unknown.image_kind(), None);
    }
}
