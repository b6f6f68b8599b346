use crate::stats::frequency::FrequencyTable;
use crate::stats::types::{BirthYearStats, UserStats};
use crate::trip::Dataset;

/// User type counts plus gender counts and birth year range when the
/// city's data carries those columns.
pub fn user_stats(dataset: &Dataset) -> UserStats {
    let trips = dataset.trips();
    let schema = dataset.schema();

    let user_types: FrequencyTable<&str> = trips.iter().filter_map(|t| t.user_type()).collect();

    let genders = schema.gender.then(|| {
        let table: FrequencyTable<&str> = trips
            .iter()
            .filter_map(|t| t.rider().gender.as_deref())
            .collect();
        owned_counts(&table)
    });

    let birth_years = schema.birth_year.then(|| {
        let years: FrequencyTable<i32> = trips.iter().filter_map(|t| t.rider().birth_year).collect();
        let known = trips.iter().filter_map(|t| t.rider().birth_year);

        BirthYearStats {
            earliest: known.clone().min(),
            most_recent: known.max(),
            most_common: years.mode().copied(),
        }
    });

    UserStats {
        user_types: owned_counts(&user_types),
        genders,
        birth_years,
    }
}

fn owned_counts(table: &FrequencyTable<&str>) -> Vec<(String, usize)> {
    table
        .sorted_by_count()
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_util::{dataset, dataset_with_schema, rider_trip};
    use crate::trip::Schema;

    const FULL: Schema = Schema {
        gender: true,
        birth_year: true,
    };

    #[test]
    fn test_user_stats_without_demographic_columns() {
        let stats = user_stats(&dataset(vec![
            rider_trip("Subscriber", None, None),
            rider_trip("Customer", None, None),
            rider_trip("Subscriber", None, None),
        ]));

        assert_eq!(
            stats.user_types,
            vec![("Subscriber".to_string(), 2), ("Customer".to_string(), 1)]
        );
        assert_eq!(stats.genders, None);
        assert_eq!(stats.birth_years, None);
    }

    #[test]
    fn test_user_stats_with_demographics() {
        let stats = user_stats(&dataset_with_schema(
            FULL,
            vec![
                rider_trip("Subscriber", Some("Male"), Some(1985)),
                rider_trip("Subscriber", Some("Female"), Some(1992)),
                rider_trip("Customer", None, None),
                rider_trip("Subscriber", Some("Male"), Some(1992)),
                rider_trip("Subscriber", Some("Female"), Some(1939)),
            ],
        ));

        assert_eq!(
            stats.genders,
            Some(vec![("Male".to_string(), 2), ("Female".to_string(), 2)])
        );
        assert_eq!(
            stats.birth_years,
            Some(BirthYearStats {
                earliest: Some(1939),
                most_recent: Some(1992),
                most_common: Some(1992),
            })
        );
    }

    #[test]
    fn test_user_stats_empty_dataset_keeps_schema_sections() {
        let stats = user_stats(&dataset_with_schema(FULL, vec![]));

        assert!(stats.user_types.is_empty());
        assert_eq!(stats.genders, Some(vec![]));
        assert_eq!(
            stats.birth_years,
            Some(BirthYearStats {
                earliest: None,
                most_recent: None,
                most_common: None,
            })
        );
    }

    #[test]
    fn test_birth_year_mode_tie_uses_first_seen() {
        let stats = user_stats(&dataset_with_schema(
            FULL,
            vec![
                rider_trip("Subscriber", None, Some(1990)),
                rider_trip("Subscriber", None, Some(1980)),
                rider_trip("Subscriber", None, Some(1980)),
                rider_trip("Subscriber", None, Some(1990)),
            ],
        ));

        assert_eq!(stats.birth_years.unwrap().most_common, Some(1990));
    }
}
