//! Reference upload file handed to admins so they can see the expected
//! column schema before preparing a real file.

use std::io;
use std::path::Path;

/// Example upload: the exact header row the pipeline expects plus one
/// well-formed data row.
pub const SAMPLE_CSV: &str = r#"name,siteUrl,phone,address,city,state,rating,photoUrl,Couples,Groups of Friends,Families,Pet-Friendly,Outdoor Seating,Live Music on Weekends,Description
5 Soul Wine Co,http://www.5soulwine.com/,+1 512-809-1672,4514 Bob Wire Rd,Spicewood,Texas,4.6,https://example.com/photo.jpg,FALSE,TRUE,TRUE,TRUE,TRUE,TRUE,"5 Soul Wine Co in Spicewood offers a welcoming outdoor haven...""#;

/// Write the sample file to `path`.
pub fn write_sample(path: impl AsRef<Path>) -> io::Result<()> {
    std::fs::write(path, SAMPLE_CSV)
}
