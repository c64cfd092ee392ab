use log::debug;

use super::store::MediaStore;

/// Spell `word` with per-letter clips.
///
/// Keeps alphabetic characters, uppercases them and maps each to `<LETTER>.mp4`.
/// All or nothing: if any letter clip is missing the result is empty.
pub fn fingerspell(store: &MediaStore, word: &str) -> Vec<String> {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(|c| c.to_uppercase())
        .collect();

    let mut references = Vec::with_capacity(letters.len());
    for letter in letters {
        let media_file = format!("{}.mp4", letter);
        if !store.contains(&media_file) {
            debug!("Fingerspelling failed for '{}': no clip for letter {}", word, letter);
            return Vec::new();
        }
        references.push(store.reference(&media_file));
    }

    references
}
