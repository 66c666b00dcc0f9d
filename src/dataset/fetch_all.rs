//! Bulk, metadata-driven iteration over archive images

use std::collections::HashMap;
use std::slice;
use image::DynamicImage;
use log::{debug, warn};

use crate::dataset::accessor::decode_image;
use crate::dataset::codec::MemberKind;
use crate::dataset::errors::{DatasetError, DatasetResult};
use crate::dataset::index::IndexedMember;
use crate::dataset::key::ImageKey;
use crate::dataset::metadata::{MetadataRow, MetadataTable};
use crate::io::SequentialReader;

/// An image matched by a metadata row
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub image: DynamicImage,
    /// `cell_code` of the matching row
    pub cell_code: String,
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    Exhausted,
}

/// Iterator returned by [`DatasetAccessor::fetch_all`](crate::dataset::DatasetAccessor::fetch_all)
///
/// Members are visited once in archive order. Members without the image
/// suffix are skipped, malformed image names are yielded as
/// `MalformedFilename` errors, and images no row matches are skipped. When
/// several rows match one image the first row in table order is used and
/// the event is logged and counted. A failed read ends the scan.
pub struct FetchAll<'a> {
    reader: SequentialReader<'a>,
    members: slice::Iter<'a, IndexedMember>,
    rows: HashMap<ImageKey, Vec<&'a MetadataRow>>,
    state: ScanState,
    yielded: usize,
    ambiguous: usize,
}

impl<'a> FetchAll<'a> {
    pub(crate) fn new(reader: SequentialReader<'a>, members: &'a [IndexedMember], metadata: &'a MetadataTable) -> Self {
        FetchAll {
            reader,
            members: members.iter(),
            rows: metadata.group_by_key(),
            state: ScanState::Scanning,
            yielded: 0,
            ambiguous: 0,
        }
    }

    /// Number of images yielded so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Number of images that matched more than one row so far
    pub fn ambiguous_matches(&self) -> usize {
        self.ambiguous
    }

    /// Number of items still to come, unless a read fails first
    ///
    /// Counts the remaining malformed image members and the remaining
    /// images at least one row matches.
    pub fn pending(&self) -> usize {
        if self.is_exhausted() {
            return 0;
        }
        self.members
            .clone()
            .filter(|member| match &member.kind {
                MemberKind::Image(key) => self.rows.contains_key(key),
                MemberKind::Malformed(_) => true,
                MemberKind::Other => false,
            })
            .count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == ScanState::Exhausted
    }

    fn load(&mut self, member: &IndexedMember, row: &MetadataRow) -> DatasetResult<FetchedImage> {
        let bytes = match self.reader.read_at(member.offset, member.size) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.state = ScanState::Exhausted;
                return Err(DatasetError::IoError(e));
            }
        };

        let image = decode_image(&bytes)?;
        self.yielded += 1;
        Ok(FetchedImage {
            image,
            cell_code: row.cell_code.clone(),
            target: row.target.clone(),
        })
    }
}

impl<'a> Iterator for FetchAll<'a> {
    type Item = DatasetResult<FetchedImage>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.state == ScanState::Scanning {
            let member = match self.members.next() {
                Some(member) => member,
                None => {
                    self.state = ScanState::Exhausted;
                    break;
                }
            };

            let key = match &member.kind {
                MemberKind::Other => continue,
                MemberKind::Malformed(reason) => {
                    return Some(Err(DatasetError::MalformedFilename(reason.clone())));
                }
                MemberKind::Image(key) => key,
            };

            let row = match self.rows.get(key) {
                None => continue,
                Some(rows) if rows.len() > 1 => {
                    let codes: Vec<&str> = rows.iter().map(|r| r.cell_code.as_str()).collect();
                    warn!(
                        "{} metadata rows match {} ({}); using cell_code {}",
                        rows.len(),
                        member.path,
                        codes.join(", "),
                        codes[0]
                    );
                    self.ambiguous += 1;
                    rows[0]
                }
                Some(rows) => rows[0],
            };

            debug!("Matched {} to cell_code {}", member.path, row.cell_code);
            return Some(self.load(member, row));
        }

        None
    }
}
