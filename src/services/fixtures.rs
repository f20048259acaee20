use crate::models::CanonicalAttraction;

/// A canonical attraction with every optional field empty
pub fn attraction(id: &str) -> CanonicalAttraction {
    CanonicalAttraction {
        id: id.to_string(),
        name: String::new(),
        category_id: 9,
        category_name: "其他".to_string(),
        longitude: None,
        latitude: None,
        recommend_score: 0,
        rating: None,
        rating_count: 0,
        heat_score: 0,
        tags: Vec::new(),
        history: String::new(),
        brief_intro: String::new(),
        reason: String::new(),
        address: String::new(),
        business_hours: None,
        per_capita_consumption: 0.0,
        image_url: None,
        stage_name: None,
        stage_start: None,
        stage_end: None,
    }
}

pub fn scored(id: &str, recommend_score: u8) -> CanonicalAttraction {
    CanonicalAttraction {
        recommend_score,
        ..attraction(id)
    }
}

pub fn ids(records: &[CanonicalAttraction]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}
