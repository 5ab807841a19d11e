// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes a finished frame to disk as a binary graymap.

use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::path::Path;

use crate::error::{Error, Result};
use crate::raster::RasterBuffer;

/// Save the raster's gray level as a PGM file.
pub fn write_image<P: AsRef<Path>>(outfile: P, raster: &RasterBuffer) -> Result<()> {
    let output = File::create(outfile.as_ref()).map_err(Error::Snapshot)?;
    let mut encoder = PNMEncoder::new(output)
        .with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary));
    encoder
        .encode(
            &raster.to_gray()[..],
            raster.width() as u32,
            raster.height() as u32,
            ColorType::Gray(8),
        )
        .map_err(Error::Snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planes::Coordinate;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn writes_a_binary_graymap() {
        let mut raster = RasterBuffer::new(4, 2);
        for (i, x) in (0..4).enumerate() {
            raster
                .write(&Coordinate::new(x, 1).with_color(10 * (i as u8 + 1)))
                .unwrap();
        }

        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.pgm");
        write_image(&path, &raster).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P5"));
        assert!(bytes.ends_with(&[0, 0, 0, 0, 10, 20, 30, 40]));
    }

    #[test]
    fn reports_unwritable_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.pgm");
        match write_image(&path, &RasterBuffer::new(1, 1)) {
            Err(Error::Snapshot(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
