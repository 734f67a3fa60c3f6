use chrono::Utc;

use super::status::Status;
use super::technology::{Category, Difficulty, Priority, Technology, TechnologyId};

const SEEDS: [(u64, &str, &str, Status, Category); 8] = [
    (
        1,
        "React Components",
        "Learning the basic React components and their lifecycle",
        Status::NotStarted,
        Category::Frontend,
    ),
    (
        2,
        "JSX Syntax",
        "Getting comfortable with JSX syntax and how it differs from HTML",
        Status::NotStarted,
        Category::Frontend,
    ),
    (
        3,
        "State Management",
        "Working with component state through useState",
        Status::InProgress,
        Category::Frontend,
    ),
    (
        4,
        "React Hooks",
        "Using hooks: useEffect, useContext, useRef",
        Status::NotStarted,
        Category::Frontend,
    ),
    (
        5,
        "React Router",
        "Routing in React applications",
        Status::NotStarted,
        Category::Frontend,
    ),
    (
        6,
        "API Integration",
        "Talking to external APIs with fetch/axios",
        Status::NotStarted,
        Category::Backend,
    ),
    (
        7,
        "Component Libraries",
        "Using UI libraries (Material-UI, Ant Design)",
        Status::Completed,
        Category::Frontend,
    ),
    (
        8,
        "Testing",
        "Testing components with Jest and React Testing Library",
        Status::InProgress,
        Category::Testing,
    ),
];

/// The built-in list used when nothing usable is stored yet.
pub fn default_technologies() -> Vec<Technology> {
    let now = Utc::now();
    SEEDS
        .iter()
        .map(|&(id, title, description, status, category)| Technology {
            id: TechnologyId::Numeric(id),
            title: title.to_string(),
            description: description.to_string(),
            status,
            notes: String::new(),
            category,
            priority: Priority::Medium,
            difficulty: Difficulty::Medium,
            deadline: None,
            estimated_hours: None,
            created_at: now,
            updated_at: now,
            progress: None,
            extra: serde_json::Map::new(),
        })
        .collect()
}
