use std::collections::BTreeMap;

use {
    devkit_lock::{LockEntry, LockFile, SourceType},
    devkit_sources::owner_repo_of,
};

use crate::github::GithubClient;

/// A tracked asset whose remote folder no longer matches the installed one.
#[derive(Debug, Clone)]
pub struct OutdatedAsset {
    pub key: String,
    pub entry: LockEntry,
    pub local_hash: String,
    pub remote_hash: String,
}

/// One asset that could not be checked.
#[derive(Debug, Clone)]
pub struct DriftFailure {
    pub key: String,
    pub reason: String,
}

/// Outcome of one drift pass over a lock document.
#[derive(Debug, Default)]
pub struct DriftReport {
    pub outdated: Vec<OutdatedAsset>,
    /// Keys whose remote hash matches the installed one.
    pub up_to_date: Vec<String>,
    /// Keys that cannot be tracked (non-GitHub source, or no folder hash
    /// was recorded at install).
    pub skipped: Vec<String>,
    pub errors: Vec<DriftFailure>,
}

impl DriftReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.outdated.len() + self.up_to_date.len() + self.skipped.len() + self.errors.len()
    }
}

struct Trackable<'a> {
    key: &'a str,
    entry: &'a LockEntry,
    local_hash: &'a str,
    skill_path: &'a str,
}

/// Whether this entry carries everything drift checking needs.
fn trackable(entry: &LockEntry) -> Option<(&str, &str, String)> {
    if entry.source_type != SourceType::Github {
        return None;
    }
    let local_hash = entry.skill_folder_hash.as_deref()?;
    let skill_path = entry.skill_path.as_deref()?;
    let owner_repo = owner_repo_of(&entry.source_url)?;
    Some((local_hash, skill_path, owner_repo))
}

/// Compare every trackable lock entry against its repository.
///
/// Entries are grouped by (owner, repo, ref); each group costs exactly one
/// tree fetch. A failed fetch fails every entry in its group and never
/// aborts the pass.
pub async fn check_drift(client: &GithubClient, lock: &LockFile) -> DriftReport {
    let mut report = DriftReport::default();
    let mut groups: BTreeMap<(String, String, String), Vec<Trackable<'_>>> = BTreeMap::new();

    for (key, entry) in &lock.assets {
        let Some((local_hash, skill_path, owner_repo)) = trackable(entry) else {
            report.skipped.push(key.clone());
            continue;
        };
        let Some((owner, repo)) = owner_repo.split_once('/').map(|(o, r)| (o.to_string(), r.to_string()))
        else {
            report.skipped.push(key.clone());
            continue;
        };
        let git_ref = entry.source_ref.clone().unwrap_or_else(|| "HEAD".to_string());
        groups.entry((owner, repo, git_ref)).or_default().push(Trackable {
            key,
            entry,
            local_hash,
            skill_path,
        });
    }

    for ((owner, repo, git_ref), members) in groups {
        let hashes = match client.fetch_folder_hashes(&owner, &repo, &git_ref).await {
            Ok(hashes) => hashes,
            Err(e) => {
                tracing::debug!(%owner, %repo, %git_ref, %e, "tree fetch failed for drift group");
                for member in members {
                    report.errors.push(DriftFailure {
                        key: member.key.to_string(),
                        reason: e.to_string(),
                    });
                }
                continue;
            },
        };

        for member in members {
            // Lock files written by other tools may carry edge slashes on
            // the path; tree listings never do.
            match hashes.get(member.skill_path.trim_matches('/')) {
                None => report.errors.push(DriftFailure {
                    key: member.key.to_string(),
                    reason: format!("path {} not found in {owner}/{repo} at {git_ref}", member.skill_path),
                }),
                Some(remote_hash) if remote_hash == member.local_hash => {
                    report.up_to_date.push(member.key.to_string());
                },
                Some(remote_hash) => report.outdated.push(OutdatedAsset {
                    key: member.key.to_string(),
                    entry: member.entry.clone(),
                    local_hash: member.local_hash.to_string(),
                    remote_hash: remote_hash.clone(),
                }),
            }
        }
    }

    report
}
