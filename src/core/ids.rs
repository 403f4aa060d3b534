/// Next identifier for a collection: one past the largest numeric id.
///
/// Ids that do not parse as unsigned integers are ignored. An empty
/// collection, or one with no numeric ids at all, starts at "1".
pub fn next_id<'a>(ids: impl IntoIterator<Item = &'a str>) -> String {
    ids.into_iter()
        .filter_map(|id| id.trim().parse::<u64>().ok())
        .max()
        .map_or(1, |max| max.saturating_add(1))
        .to_string()
}
