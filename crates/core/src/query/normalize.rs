/// Title-cases each whitespace-delimited token, matching how product names are stored.
///
/// Only the first character of each token is changed; runs of whitespace collapse
/// to a single space.
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
