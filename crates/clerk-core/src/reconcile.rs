//! Reconciliation of a target directory against an aggregate
//!
//! A run loads the manifest, writes every supplied file that is new or
//! changed, deletes every previously owned file nothing supplies anymore,
//! and saves the manifest once at the end. Files changed outside the tool
//! since the last run are only overwritten or deleted after confirmation.
//!
//! A fatal error stops the run before the manifest is saved. Files already
//! written or removed by then stay that way; the run is not transactional
//! across files.

use crate::aggregate::Aggregate;
use crate::confirm::{Action, Confirm, Prompt};
use crate::manifest::{MANIFEST_FILE, Manifest};
use crate::report::{ApplyReport, Change, DriftItem, DriftKind, Plan, PlannedChange};
use crate::source::FileSource;
use crate::{Error, Result};
use clerk_fs::{Digest, RelativePath, io};
use std::collections::BTreeSet;
use std::path::Path;

/// Classify a path some source supplies.
///
/// A missing manifest entry and a missing file both read as the empty
/// digest, so a brand new path that is not on disk yet is not drift. Only an
/// owned path can be adopted; an unowned file in the way always needs
/// confirmation, even when it already holds the desired bytes.
fn classify_supplied(recorded: Option<&Digest>, on_disk: &Digest, desired: &Digest) -> Change {
    let owned = recorded.is_some();
    let empty = Digest::empty();
    let recorded = recorded.unwrap_or(&empty);
    let drifted = on_disk != recorded;

    if on_disk == desired && (owned || !drifted) {
        if drifted { Change::Adopt } else { Change::Keep }
    } else if drifted {
        Change::Conflict(Action::Overwrite)
    } else if on_disk.is_empty() {
        Change::Add
    } else {
        Change::Update
    }
}

/// Classify an owned path no source supplies anymore.
fn classify_stale(recorded: &Digest, on_disk: &Digest) -> Change {
    if on_disk == recorded {
        Change::Delete
    } else {
        Change::Conflict(Action::Delete)
    }
}

fn source_digest(source: &dyn FileSource, path: &RelativePath) -> Result<Digest> {
    Digest::of_reader(source.open(path)?).map_err(|e| Error::Source {
        source_name: source.name().to_string(),
        path: path.to_string(),
        source: e,
    })
}

fn is_not_found(err: &clerk_fs::Error) -> bool {
    err.io_source()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

impl Aggregate {
    /// Preview a run against `dir` without touching disk or asking anyone.
    pub fn plan(&self, dir: &Path) -> Result<Plan> {
        let manifest = Manifest::load(&dir.join(MANIFEST_FILE))?;
        let mut changes = Vec::new();

        for (source, files) in self.sources() {
            for path in files {
                let on_disk = Digest::of_file(&path.to_native(dir));
                let desired = source_digest(source, path)?;
                changes.push(PlannedChange {
                    path: path.clone(),
                    change: classify_supplied(manifest.get(path), &on_disk, &desired),
                });
            }
        }

        for (path, recorded) in manifest.iter() {
            if self.find(path).is_some() {
                continue;
            }
            let on_disk = Digest::of_file(&path.to_native(dir));
            changes.push(PlannedChange {
                path: path.clone(),
                change: classify_stale(recorded, &on_disk),
            });
        }

        changes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(Plan { changes })
    }

    /// Reconcile `dir` with this aggregate.
    ///
    /// # Errors
    ///
    /// Any [`Error`] aborts the run and leaves `clerk.sum` as it was before
    /// the run. Declined confirmations are reported in
    /// [`ApplyReport::skipped`], not as errors.
    pub fn apply(&self, dir: &Path, confirm: &mut dyn Confirm) -> Result<ApplyReport> {
        let manifest_path = dir.join(MANIFEST_FILE);
        let mut manifest = Manifest::load(&manifest_path)?;
        let mut removal: BTreeSet<RelativePath> = manifest.paths().cloned().collect();
        let mut report = ApplyReport::new(manifest_path.clone());

        tracing::debug!(?dir, sources = self.len(), owned = manifest.len(), "Starting run");

        for (source, files) in self.sources() {
            for path in files {
                removal.remove(path);

                let native = path.to_native(dir);
                if let Some(parent) = native.parent() {
                    io::ensure_dir(parent).map_err(|e| Error::Directory {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
                }

                let on_disk = Digest::of_file(&native);
                let desired = source_digest(source, path)?;

                match classify_supplied(manifest.get(path), &on_disk, &desired) {
                    Change::Keep => {
                        tracing::debug!(%path, "Unchanged");
                        report.kept.push(path.clone());
                        continue;
                    }
                    Change::Adopt => {
                        tracing::info!("Adopted {}", path);
                        manifest.insert(path.clone(), on_disk);
                        report.adopted.push(path.clone());
                        continue;
                    }
                    Change::Conflict(action) if !confirm.confirm(&Prompt::new(path, action)) => {
                        tracing::warn!("Skipped {} of changed file {}", action, path);
                        report.skipped.push((path.clone(), action));
                        continue;
                    }
                    _ => {}
                }

                // Confirmed takeover of an unowned file that already matches
                if on_disk == desired {
                    tracing::info!("Adopted {}", path);
                    manifest.insert(path.clone(), on_disk);
                    report.adopted.push(path.clone());
                    continue;
                }

                let written = io::write_stream(&native, source.open(path)?)
                    .map_err(|e| Error::Write {
                        path: path.clone(),
                        source: e,
                    })?;
                manifest.insert(path.clone(), written);

                if on_disk.is_empty() {
                    tracing::info!("Created {}", path);
                    report.added.push(path.clone());
                } else {
                    tracing::info!("Updated {}", path);
                    report.updated.push(path.clone());
                }
            }
        }

        for path in removal {
            let native = path.to_native(dir);
            let recorded = manifest.get(&path).cloned().unwrap_or_default();
            let on_disk = Digest::of_file(&native);

            if let Change::Conflict(action) = classify_stale(&recorded, &on_disk) {
                if !confirm.confirm(&Prompt::new(&path, action)) {
                    tracing::warn!("Skipped {} of changed file {}", action, path);
                    report.skipped.push((path, action));
                    continue;
                }
            }

            match io::remove_file(&native) {
                Ok(()) => tracing::info!("Removed {}", path),
                Err(e) if is_not_found(&e) => tracing::debug!(%path, "Already gone"),
                Err(source) => return Err(Error::Removal { path, source }),
            }
            manifest.remove(&path);
            report.removed.push(path);
        }

        manifest.save(&manifest_path)?;
        Ok(report)
    }
}

/// Reconcile `dir` with `aggregate`.
///
/// Entry point equivalent to [`Aggregate::apply`].
pub fn apply(aggregate: &Aggregate, dir: &Path, confirm: &mut dyn Confirm) -> Result<ApplyReport> {
    aggregate.apply(dir, confirm)
}

/// Compare every owned file in `dir` with its manifest digest.
///
/// Needs no sources: reports files modified or removed since the tool last
/// wrote them, in path order.
pub fn verify(dir: &Path) -> Result<Vec<DriftItem>> {
    let manifest = Manifest::load(&dir.join(MANIFEST_FILE))?;
    let drift = manifest
        .iter()
        .filter_map(|(path, recorded)| {
            let on_disk = Digest::of_file(&path.to_native(dir));
            if &on_disk == recorded {
                None
            } else if on_disk.is_empty() {
                Some(DriftItem {
                    path: path.clone(),
                    kind: DriftKind::Missing,
                })
            } else {
                Some(DriftItem {
                    path: path.clone(),
                    kind: DriftKind::Modified,
                })
            }
        })
        .collect();
    Ok(drift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(content: &str) -> Digest {
        Digest::of_bytes(content)
    }

    #[rstest]
    #[case::new_file(None, Digest::empty(), d("new"), Change::Add)]
    #[case::unchanged(Some(d("old")), d("old"), d("old"), Change::Keep)]
    #[case::source_changed(Some(d("old")), d("old"), d("new"), Change::Update)]
    #[case::edited_on_disk(Some(d("old")), d("edited"), d("new"), Change::Conflict(Action::Overwrite))]
    #[case::deleted_on_disk(Some(d("old")), Digest::empty(), d("old"), Change::Conflict(Action::Overwrite))]
    #[case::unowned_file_in_the_way(None, d("theirs"), d("ours"), Change::Conflict(Action::Overwrite))]
    #[case::unowned_file_already_matches(None, d("same"), d("same"), Change::Conflict(Action::Overwrite))]
    #[case::edited_to_match_source(Some(d("old")), d("new"), d("new"), Change::Adopt)]
    fn supplied_paths(
        #[case] recorded: Option<Digest>,
        #[case] on_disk: Digest,
        #[case] desired: Digest,
        #[case] expected: Change,
    ) {
        assert_eq!(classify_supplied(recorded.as_ref(), &on_disk, &desired), expected);
    }

    #[rstest]
    #[case::untouched(d("v1"), d("v1"), Change::Delete)]
    #[case::edited(d("v1"), d("v2"), Change::Conflict(Action::Delete))]
    #[case::already_deleted(d("v1"), Digest::empty(), Change::Conflict(Action::Delete))]
    fn stale_paths(#[case] recorded: Digest, #[case] on_disk: Digest, #[case] expected: Change) {
        assert_eq!(classify_stale(&recorded, &on_disk), expected);
    }
}
