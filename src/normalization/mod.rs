//! Deterministic record clean-up applied between the source adapters and the store.
//!
//! `normalize` is total and idempotent: running it twice gives the same record as running it once.

pub mod fields;
pub mod name;

use itertools::Itertools;

use crate::model::RawPlayerRecord;

pub use fields::{clean_optional, pad_jersey, parse_birth_date};
pub use name::{hardware_safe_fallback, match_key, normalize_player_name, phonetic_fallback, strip_diacritics};

/// Normalize one record: name, jersey, birth date, then placeholder clean-up of descriptive fields.
pub fn normalize(mut record: RawPlayerRecord) -> RawPlayerRecord {
    record.team_id = record.team_id.trim().to_string();
    record.player_name = normalize_player_name(&record.player_name);
    record.jersey_number = pad_jersey(record.jersey_number.as_deref());
    record.birth_date = parse_birth_date(record.birth_date.as_deref());

    for slot in [
        &mut record.player_id,
        &mut record.position,
        &mut record.height,
        &mut record.weight,
        &mut record.college,
        &mut record.birthplace,
        &mut record.nationality,
    ] {
        *slot = clean_optional(slot.as_deref());
    }
    record
}

/// Normalize a fetched roster and drop rows that end up nameless or collide on the natural key.
/// The first occurrence of a key wins.
pub fn normalize_batch(records: Vec<RawPlayerRecord>) -> Vec<RawPlayerRecord> {
    records
        .into_iter()
        .map(normalize)
        .filter(|r| !r.player_name.is_empty())
        .unique_by(|r| r.key())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str) -> RawPlayerRecord {
        RawPlayerRecord::new("dallas-cowboys", 2022, name)
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut r = raw("Luis Díaz L. Díaz");
        r.jersey_number = Some("7".into());
        r.birth_date = Some("1/13/1997".into());
        r.height = Some("--".into());
        r.college = Some("  Universidad   de Barranquilla ".into());

        let once = normalize(r);
        assert_eq!(once.player_name, "Luis Diaz");
        assert_eq!(once.jersey_number.as_deref(), Some("07"));
        assert_eq!(once.birth_date.as_deref(), Some("1997-01-13"));
        assert_eq!(once.height, None);
        assert_eq!(once.college.as_deref(), Some("Universidad de Barranquilla"));
        assert_eq!(normalize(once.clone()), once);
    }

    #[test]
    fn jersey_properties() {
        let mut r = raw("A");
        r.jersey_number = Some("00".into());
        assert_eq!(normalize(r).jersey_number.as_deref(), Some("00"));
        assert_eq!(normalize(raw("A")).jersey_number, None);
    }

    #[test]
    fn invalid_birth_date_becomes_null() {
        let mut r = raw("Someone");
        r.birth_date = Some("13/45/2020".into());
        assert_eq!(normalize(r).birth_date, None);
    }

    #[test]
    fn batch_keeps_first_occurrence_after_normalizing() {
        let mut first = raw("Luis Díaz");
        first.jersey_number = Some("7".into());
        let mut second = raw("Luis Diaz");
        second.jersey_number = Some("19".into());

        let out = normalize_batch(vec![first, second, raw("   ")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].jersey_number.as_deref(), Some("07"));
    }
}
