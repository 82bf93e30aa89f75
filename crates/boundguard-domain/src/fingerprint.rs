use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for an import finding.
///
/// Identity fields:
/// - check_id
/// - code
/// - importer path (repo-relative)
/// - imported path (if the finding is about an edge)
pub fn fingerprint_for_edge(
    check_id: &str,
    code: &str,
    importer: &str,
    imported: Option<&str>,
) -> String {
    let mut parts = vec![check_id, code, importer];
    if let Some(p) = imported {
        parts.push(p);
    }
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
