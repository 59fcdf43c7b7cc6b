//! Computer keyboard -> catalog note
//!
//! Two rows laid out like a piano: the bottom letter row plays C4..B4 with
//! sharps on the home row above it, the top letter row plays C5..C6 with
//! sharps on the number row.
//!
//!    s d   g h j       2 3   5 6 7
//!   z x c v b n m     q w e r t y u i
//!   C4 ........ B4    C5 ........... C6

const LOWER: [char; 12] = ['z', 's', 'x', 'd', 'c', 'v', 'g', 'b', 'h', 'n', 'j', 'm'];
const UPPER: [char; 13] = [
    'q', '2', 'w', '3', 'e', 'r', '5', 't', '6', 'y', '7', 'u', 'i',
];

/// Catalog index played by `key`, if any. Case-insensitive.
pub fn note_index(key: char) -> Option<usize> {
    let key = key.to_ascii_lowercase();
    LOWER
        .iter()
        .chain(UPPER.iter())
        .position(|&k| k == key)
}

/// Key that plays catalog note `index`.
pub fn key_for(index: usize) -> Option<char> {
    LOWER.iter().chain(UPPER.iter()).nth(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ear_trainer::catalog::NOTES;

    #[test]
    fn every_note_has_exactly_one_key() {
        for index in 0..NOTES.len() {
            let key = key_for(index).expect("key");
            assert_eq!(note_index(key), Some(index));
        }
        assert_eq!(key_for(NOTES.len()), None);
    }

    #[test]
    fn sharps_sit_on_the_upper_row_of_each_pair() {
        for (index, note) in NOTES.iter().enumerate() {
            let key = key_for(index).expect("key");
            let on_sharp_row = key.is_ascii_digit() || "sdghj".contains(key);
            assert_eq!(on_sharp_row, note.is_sharp(), "{key} -> {note}");
        }
    }

    #[test]
    fn shifted_keys_still_play() {
        assert_eq!(note_index('Z'), Some(0));
        assert_eq!(note_index('I'), Some(24));
        assert_eq!(note_index('p'), None);
    }
}
