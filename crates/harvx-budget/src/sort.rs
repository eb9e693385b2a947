use harvx_types::FileDescriptor;

/// Promotes every descriptor whose `path` exactly matches an entry in
/// `priority_files` to tier 0, unconditionally overriding whatever tier
/// the classifier assigned. A profile author naming a file in
/// `priority_files` is expressing an override, not a hint — see
/// `DESIGN.md`'s Open Question resolution on promotion semantics.
pub fn promote_priority_files(files: &mut [FileDescriptor], priority_files: &[String]) {
    if priority_files.is_empty() {
        return;
    }
    for fd in files.iter_mut() {
        if priority_files.iter().any(|p| p == &fd.path) {
            fd.tier = 0;
        }
    }
}

/// Stable sort by `(tier ascending, path ascending)`. Deterministic:
/// identical inputs always yield identical orders.
pub fn stable_sort(files: &mut Vec<FileDescriptor>) {
    files.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.path.cmp(&b.path)));
}
