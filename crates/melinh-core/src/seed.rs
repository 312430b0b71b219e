//! Demo data for the six admin collections.

use serde_json::json;

use crate::models::{Collection, CollectionError, CollectionKind, Record};
use crate::repository::InMemoryRepository;

fn schedule(date: &str, hour: u32) -> serde_json::Value {
    json!({"date": date, "time": {"hour": hour}})
}

fn doctors() -> Vec<Record> {
    vec![
        Record::new(1)
            .with("name", "Nguyen Thi Lan")
            .with("title", "MD, PhD")
            .with("languages", "Vietnamese, English")
            .with("specialties", "Obstetrics, high-risk pregnancy, prenatal screening")
            .with("image", "https://cdn.melinh.example/doctors/lan.jpg"),
        Record::new(2)
            .with("name", "Tran Van Minh")
            .with("title", "MD")
            .with("languages", "Vietnamese")
            .with("specialties", "Neurology")
            .with("image", "https://cdn.melinh.example/doctors/minh.jpg"),
        Record::new(3)
            .with("name", "Le Thu Hoa")
            .with("title", "MSc")
            .with("languages", "Vietnamese, French")
            .with("specialties", "Pediatrics")
            .with("image", "https://cdn.melinh.example/doctors/hoa.jpg"),
    ]
}

fn services() -> Vec<Record> {
    vec![
        Record::new(1).with("name", "General check-up").with("price", 300000),
        Record::new(2).with("name", "Prenatal ultrasound").with("price", 450000),
        Record::new(3).with("name", "Blood panel").with("price", 250000),
    ]
}

fn departments() -> Vec<Record> {
    vec![
        Record::new(1).with("name", "Obstetrics").with("floor", 2),
        Record::new(2).with("name", "Neurology").with("floor", 3),
        Record::new(3).with("name", "Pediatrics").with("floor", 1),
    ]
}

fn articles() -> Vec<Record> {
    vec![
        Record::new(1)
            .with("title", "Preparing for your first prenatal visit")
            .with("image", "https://cdn.melinh.example/articles/prenatal.jpg")
            .with("content", "What to bring, what to expect, and which questions to ask your doctor."),
        Record::new(2)
            .with("title", "Seasonal flu vaccination is open")
            .with("image", "https://cdn.melinh.example/articles/flu.jpg")
            .with("content", "Walk-in vaccination is available every weekday morning."),
    ]
}

fn schedules() -> Vec<Record> {
    vec![
        Record::new(1)
            .with("doctorId", 1)
            .with("schedule", schedule("2025-03-04", 9)),
        Record::new(2)
            .with("doctorId", 2)
            .with("schedule", schedule("2025-03-04", 14)),
    ]
}

fn invoices() -> Vec<Record> {
    vec![Record::new(1)
        .with("patientName", "Web User")
        .with("total", 450000)
        .with("status", "paid")
        .with("schedule", schedule("2025-03-04", 9))]
}

/// All six collections with a few realistic records each.
pub fn demo_collections() -> Result<Vec<Collection>, CollectionError> {
    [
        (CollectionKind::Doctors, doctors()),
        (CollectionKind::Services, services()),
        (CollectionKind::Departments, departments()),
        (CollectionKind::Articles, articles()),
        (CollectionKind::Schedules, schedules()),
        (CollectionKind::Invoices, invoices()),
    ]
    .into_iter()
    .map(|(kind, records)| Collection::new(kind, records))
    .collect()
}

/// In-memory repository preloaded with [`demo_collections`].
pub fn demo_repository() -> Result<InMemoryRepository, CollectionError> {
    Ok(InMemoryRepository::with_collections(demo_collections()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ensure_unique_ids;
    use crate::repository::RecordRepository;

    #[test]
    fn test_demo_collections_are_valid() {
        let collections = demo_collections().unwrap();
        assert_eq!(collections.len(), CollectionKind::ALL.len());
        for collection in &collections {
            assert!(ensure_unique_ids(collection.records()).is_ok());
        }
    }

    #[test]
    fn test_demo_repository() {
        let repo = demo_repository().unwrap();
        assert_eq!(repo.count(CollectionKind::Doctors).unwrap(), 3);
        assert_eq!(repo.count(CollectionKind::Invoices).unwrap(), 1);
    }
}
