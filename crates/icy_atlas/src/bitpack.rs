//! Dense 1 bit per pixel serialization of a [`BinaryImage`].
//!
//! Layout:
//! - rows are stored top to bottom
//! - every row starts on a fresh byte, `row_stride = ceil(width / 8)`
//! - bit 7 (MSB) of a byte is the leftmost of its 8 pixels
//! - unused low bits of the last byte of a row are 0

use crate::{AtlasError, BinaryImage, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitPackedAtlas {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

/// Bytes needed for one row of `width` pixels.
pub fn row_stride(width: u32) -> usize {
    width.div_ceil(8) as usize
}

impl BitPackedAtlas {
    /// Wraps existing packed data, checking the length against the dimensions.
    pub fn from_bytes(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        let expected = row_stride(width) * height as usize;
        if bytes.len() != expected {
            return Err(AtlasError::PackedLengthMismatch { expected, actual: bytes.len() });
        }
        Ok(Self { width, height, bytes })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn row_stride(&self) -> usize {
        row_stride(self.width)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Packed bytes of row `y`, empty past the last row.
    pub fn row(&self, y: u32) -> &[u8] {
        if y >= self.height {
            return &[];
        }
        let stride = self.row_stride();
        let start = y as usize * stride;
        &self.bytes[start..start + stride]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    /// Reads one pixel the way a consumer indexes the array.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.bytes[y as usize * self.row_stride() + (x / 8) as usize];
        byte & (0x80 >> (x % 8)) != 0
    }
}

/// Packs 8 pixels per byte, MSB first, each row byte aligned.
pub fn pack(image: &BinaryImage) -> BitPackedAtlas {
    let stride = row_stride(image.width());
    let mut bytes = Vec::with_capacity(stride * image.height() as usize);

    for row in image.rows() {
        for group in row.chunks(8) {
            let mut byte = 0u8;
            for (j, on) in group.iter().enumerate() {
                if *on {
                    byte |= 1 << (7 - j);
                }
            }
            bytes.push(byte);
        }
    }

    BitPackedAtlas {
        width: image.width(),
        height: image.height(),
        bytes,
    }
}

/// Expands packed data back into a [`BinaryImage`], padding bits are ignored.
pub fn unpack(packed: &BitPackedAtlas) -> BinaryImage {
    let mut image = BinaryImage::new(packed.width(), packed.height());
    for y in 0..packed.height() {
        for x in 0..packed.width() {
            if packed.pixel(x, y) {
                image.set_pixel(x, y, true);
            }
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{pack, row_stride, unpack, BitPackedAtlas};
    use crate::{AtlasError, BinaryImage};

    fn image_from_rows(rows: &[&[u8]]) -> BinaryImage {
        let width = rows[0].len() as u32;
        let pixels = rows.iter().flat_map(|r| r.iter().map(|p| *p == 1)).collect();
        BinaryImage::from_pixels(width, rows.len() as u32, pixels).unwrap()
    }

    #[test]
    fn test_alternating_row() {
        let packed = pack(&image_from_rows(&[&[1, 0, 1, 0, 1, 0, 1, 0]]));
        assert_eq!(&[0xAA], packed.bytes());
    }

    #[test]
    fn test_all_background_and_foreground() {
        let packed = pack(&BinaryImage::new(8, 8));
        assert_eq!(vec![0x00; 8], packed.bytes());

        let full = BinaryImage::from_pixels(8, 8, vec![true; 64]).unwrap();
        assert_eq!(vec![0xFF; 8], pack(&full).bytes());
    }

    #[test]
    fn test_partial_last_byte_is_zero_padded() {
        let packed = pack(&image_from_rows(&[&[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1], &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]]));
        assert_eq!(2, packed.row_stride());
        assert_eq!(&[0xFF, 0xE0, 0x00, 0x20], packed.bytes());
    }

    #[test]
    fn test_rows_never_share_bytes() {
        // 3 pixels wide: without row alignment both rows would fit in one byte.
        let packed = pack(&image_from_rows(&[&[1, 0, 1], &[0, 1, 0]]));
        assert_eq!(&[0xA0, 0x40], packed.bytes());
    }

    #[test]
    fn test_three_cell_atlas_size() {
        let packed = pack(&BinaryImage::new(24, 8));
        assert_eq!(3, packed.row_stride());
        assert_eq!(24, packed.len());

        let single_cell = pack(&BinaryImage::new(8, 8));
        assert_eq!(8, single_cell.len());
    }

    #[test]
    fn test_round_trip_odd_width() {
        let mut image = BinaryImage::new(13, 4);
        for (x, y) in [(0, 0), (7, 0), (8, 1), (12, 2), (5, 3), (12, 3)] {
            image.set_pixel(x, y, true);
        }
        let packed = pack(&image);
        assert_eq!(row_stride(13) * 4, packed.len());
        assert_eq!(image, unpack(&packed));
    }

    #[test]
    fn test_padding_bits_read_as_background() {
        let packed = BitPackedAtlas::from_bytes(3, 1, vec![0xFF]).unwrap();
        let image = unpack(&packed);
        assert_eq!(&[true, true, true], image.row(0));
        assert!(!packed.pixel(3, 0));
    }

    #[test]
    fn test_single_pixel_change_stays_in_its_row() {
        let mut image = BinaryImage::new(20, 5);
        let before = pack(&image);
        image.set_pixel(17, 2, true);
        let after = pack(&image);

        let stride = before.row_stride();
        for (i, (a, b)) in before.bytes().iter().zip(after.bytes()).enumerate() {
            if a != b {
                assert_eq!(2, i / stride, "byte {i} outside of row 2 changed");
            }
        }
        assert_ne!(before.row(2), after.row(2));
    }

    #[test]
    fn test_out_of_range_reads_are_empty() {
        let packed = BitPackedAtlas::from_bytes(9, 2, vec![0xFF; 4]).unwrap();
        assert!(packed.row(2).is_empty());
        assert!(!packed.pixel(0, 2));
        assert_eq!(2, packed.rows().count());
    }

    #[test]
    fn test_from_bytes_checks_length() {
        let err = BitPackedAtlas::from_bytes(9, 2, vec![0; 3]).unwrap_err();
        assert!(matches!(err, AtlasError::PackedLengthMismatch { expected: 4, actual: 3 }));
    }
}
