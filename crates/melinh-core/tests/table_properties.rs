//! Property tests for table search and pagination.

use proptest::prelude::*;

use melinh_core::models::Record;
use melinh_core::table::{matches, RecordTable};

fn records_from(names: &[String]) -> Vec<Record> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Record::new(i as i64 + 1).with("name", name.clone()))
        .collect()
}

proptest! {
    #[test]
    fn pages_partition_the_filtered_records(
        names in prop::collection::vec("[a-c]{0,4}", 0..60),
        query in "[a-cA-C]{0,2}",
        page_size in 1usize..15,
    ) {
        let mut table = RecordTable::new("Doctors", records_from(&names)).with_page_size(page_size);
        table.set_search(query.clone());

        let filtered: Vec<i64> = table.filtered().iter().map(|r| r.id()).collect();
        let paged: Vec<i64> = (1..=table.total_pages())
            .flat_map(|page| table.slice_for(page).into_iter().map(|r| r.id()).collect::<Vec<_>>())
            .collect();

        prop_assert_eq!(&paged, &filtered);
        prop_assert!(table.slice_for(table.total_pages() + 1).is_empty());

        let expected_pages = filtered.len().div_ceil(page_size).max(1);
        prop_assert_eq!(table.total_pages(), expected_pages);
    }

    #[test]
    fn search_keeps_exactly_the_matching_records(
        names in prop::collection::vec("[a-c]{0,4}", 0..40),
        query in "[a-cA-C]{0,2}",
    ) {
        let records = records_from(&names);
        let mut table = RecordTable::new("Services", records.clone());
        table.set_search(query.clone());

        let kept: Vec<i64> = table.filtered().iter().map(|r| r.id()).collect();
        let expected: Vec<i64> = records
            .iter()
            .filter(|r| matches(r, &query))
            .map(|r| r.id())
            .collect();
        prop_assert_eq!(kept, expected);

        let lowered = query.to_lowercase();
        for record in table.filtered() {
            let name = record.get("name").and_then(|v| v.as_str()).unwrap_or_default();
            let id = record.id().to_string();
            prop_assert!(name.contains(&lowered) || id.contains(&lowered));
        }
    }

    #[test]
    fn paging_stays_in_range(
        count in 0usize..50,
        steps in prop::collection::vec(any::<bool>(), 0..30),
    ) {
        let names: Vec<String> = (0..count).map(|i| format!("doctor {}", i)).collect();
        let mut table = RecordTable::new("Doctors", records_from(&names));

        for forward in steps {
            if forward {
                table.next_page();
            } else {
                table.prev_page();
            }
            prop_assert!(table.page() >= 1);
            prop_assert!(table.page() <= table.total_pages());
            prop_assert_eq!(table.has_prev(), table.page() > 1);
            prop_assert_eq!(table.has_next(), table.page() < table.total_pages());
        }
    }
}
