//! One-pass index of an archive's members
//!
//! The archive is walked once when a dataset is opened. Every regular file
//! is recorded with the offset of its data in the decoded stream, so later
//! lookups never rescan the archive.

use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use log::{debug, info, warn};

use crate::dataset::codec::{FilenameCodec, MemberKind};
use crate::dataset::errors::DatasetResult;
use crate::dataset::key::ImageKey;

/// A regular file inside the archive
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedMember {
    /// Member path with any leading `./` removed
    pub path: String,
    /// Offset of the member data in the decoded tar stream
    pub offset: u64,
    /// Size of the member data in bytes
    pub size: u64,
    /// Classification of the member name
    pub kind: MemberKind,
}

/// Members of an archive in archive order, with path and key lookups
#[derive(Debug, Default)]
pub struct ArchiveIndex {
    members: Vec<IndexedMember>,
    by_path: HashMap<String, usize>,
    by_key: HashMap<ImageKey, usize>,
    malformed: usize,
}

impl ArchiveIndex {
    /// Walk a decoded tar stream and index its regular files
    ///
    /// A path that occurs more than once resolves to its last occurrence.
    pub fn build<R: Read>(reader: R, codec: &FilenameCodec) -> DatasetResult<Self> {
        let mut archive = tar::Archive::new(reader);
        let mut index = ArchiveIndex::default();

        for entry in archive.entries()? {
            let entry = entry?;
            if !entry.header().entry_type().is_file() {
                continue;
            }

            let raw_path = entry.path()?.to_string_lossy().replace('\\', "/");
            let path = raw_path.trim_start_matches("./").to_string();
            let kind = codec.parse_member_path(&path);

            if let MemberKind::Malformed(reason) = &kind {
                warn!("Malformed image member {}", reason);
            }

            index.push(IndexedMember {
                path,
                offset: entry.raw_file_position(),
                size: entry.size(),
                kind,
            });
        }

        info!(
            "Indexed {} members ({} images, {} malformed)",
            index.len(),
            index.image_count(),
            index.malformed
        );
        Ok(index)
    }

    fn push(&mut self, member: IndexedMember) {
        let position = self.members.len();

        if let Some(previous) = self.by_path.insert(member.path.clone(), position) {
            debug!("Member {} appears again, replacing entry #{}", member.path, previous);
            if let MemberKind::Image(key) = &self.members[previous].kind {
                if self.by_key.get(key) == Some(&previous) {
                    self.by_key.remove(key);
                }
            }
        }

        match &member.kind {
            MemberKind::Image(key) => {
                self.by_key.insert(key.clone(), position);
            }
            MemberKind::Malformed(_) => self.malformed += 1,
            MemberKind::Other => {}
        }

        self.members.push(member);
    }

    /// Number of indexed members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// All members in archive order
    pub fn members(&self) -> &[IndexedMember] {
        &self.members
    }

    pub fn get_by_path(&self, path: &str) -> Option<&IndexedMember> {
        self.by_path.get(path).map(|&i| &self.members[i])
    }

    pub fn get_by_key(&self, key: &ImageKey) -> Option<&IndexedMember> {
        self.by_key.get(key).map(|&i| &self.members[i])
    }

    /// Number of distinct well-formed images
    pub fn image_count(&self) -> usize {
        self.by_key.len()
    }

    /// Number of image-suffixed members that failed to decode
    pub fn malformed_count(&self) -> usize {
        self.malformed
    }

    /// Sorted unique targets
    pub fn targets(&self) -> Vec<String> {
        self.by_key.keys().map(|k| k.target.clone()).collect::<BTreeSet<_>>().into_iter().collect()
    }

    /// Sorted unique plates, in metadata form
    pub fn plates(&self) -> Vec<String> {
        self.by_key.keys().map(|k| k.plate.clone()).collect::<BTreeSet<_>>().into_iter().collect()
    }
}
