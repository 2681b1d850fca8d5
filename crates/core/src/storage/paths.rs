//! Vault path helpers shared by the vault implementations and the repository.

/// Parent folder of `path`, `""` at the vault root.
pub fn parent_folder(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// File name of `path` without folder and extension (`a/b/phone.md` → `phone`).
pub fn basename(path: &str) -> &str {
    let file = path.rsplit_once('/').map(|(_, f)| f).unwrap_or(path);
    match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    }
}

/// Join a folder and a file name.
pub fn join(folder: &str, file: &str) -> String {
    if folder.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", folder.trim_end_matches('/'), file)
    }
}

/// Note path a link target points at when taken literally: `target.md`
/// unless the target already names an extension.
pub fn note_file_name(target: &str) -> String {
    let file = target.rsplit_once('/').map(|(_, f)| f).unwrap_or(target);
    if file.contains('.') {
        target.to_string()
    } else {
        format!("{target}.md")
    }
}

/// Percent-encode a file name. Everything outside `A-Z a-z 0-9 - _ . ~`
/// is escaped, so `!*'()` are encoded too.
pub fn encode_file_name(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Resolve a wikilink `target` against the set of vault files, the way the
/// host does: the literal path first, then the same folder as `source_path`,
/// then any file with that name anywhere (shortest path wins).
pub fn resolve_among<'a, I>(files: I, target: &str, source_path: &str) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let target = target.trim().trim_start_matches('/');
    if target.is_empty() {
        return None;
    }
    let files: Vec<&str> = files.into_iter().collect();
    let wanted = note_file_name(target);

    let literal = wanted.clone();
    let sibling = join(parent_folder(source_path), &wanted);
    for candidate in [literal, sibling] {
        if files.iter().any(|f| *f == candidate) {
            return Some(candidate);
        }
    }

    let wanted_file = wanted.rsplit_once('/').map(|(_, f)| f).unwrap_or(wanted.as_str());
    files
        .into_iter()
        .filter(|f| f.rsplit_once('/').map(|(_, name)| name).unwrap_or(*f) == wanted_file)
        .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        .map(str::to_string)
}
