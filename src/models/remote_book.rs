//! Public-domain book search models (Gutendex)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// One page of a Gutendex `/books/` response
#[derive(Debug, Clone, Deserialize)]
pub struct GutendexPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<GutendexBook>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GutendexBook {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Vec<GutendexPerson>,
    #[serde(default)]
    pub languages: Vec<String>,
    /// Media type to URL, in upstream order
    #[serde(default)]
    pub formats: IndexMap<String, String>,
    #[serde(default)]
    pub download_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GutendexPerson {
    pub name: String,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub death_year: Option<i32>,
}

/// Whether the link downloads a file or opens a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DownloadKind {
    Download,
    View,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DownloadOption {
    pub url: String,
    /// PDF, EPUB, Text or HTML
    pub label: String,
    pub kind: DownloadKind,
}

/// Search result ready for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RemoteBook {
    pub id: i64,
    pub title: String,
    /// First listed author, or "Unknown author"
    pub author: String,
    pub languages: Vec<String>,
    pub cover_url: String,
    pub download: Option<DownloadOption>,
    pub download_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResults {
    /// Total reported by the upstream service
    pub count: u64,
    pub books: Vec<RemoteBook>,
}

/// Query parameters for the public-domain search
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookSearchQuery {
    /// Title or author words
    pub search: Option<String>,
    /// Language code such as "es" or "en"
    pub language: Option<String>,
    /// Bookshelf category value from `/search/categories`
    pub category: Option<String>,
    /// Upstream page to start from (1-based)
    pub page: Option<u32>,
}

/// Bookshelf category offered to searchers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchCategory {
    pub value: String,
    pub label: String,
}

pub fn categories() -> Vec<SearchCategory> {
    CATEGORIES
        .iter()
        .map(|(value, label)| SearchCategory {
            value: value.to_string(),
            label: label.to_string(),
        })
        .collect()
}

const CATEGORIES: &[(&str, &str)] = &[
    ("Literature", "Literature"),
    ("Adventure", "Adventure"),
    ("American_Literature", "American literature"),
    ("British_Literature", "British literature"),
    ("French_Literature", "French literature"),
    ("German_Literature", "German literature"),
    ("Russian_Literature", "Russian literature"),
    ("Classics", "Classics"),
    ("Biography", "Biography"),
    ("Fiction", "Fiction"),
    ("Short_Stories", "Short stories"),
    ("Poetry", "Poetry"),
    ("Drama", "Drama"),
    ("Romance", "Romance"),
    ("Science_Fiction", "Science fiction and fantasy"),
    ("Crime_and_Mystery", "Crime and mystery"),
    ("Mythology", "Mythology and folklore"),
    ("Humour", "Humour"),
    ("Children_Literature", "Children and young adult"),
    ("Literature_Other", "Literature, other"),
    ("Science_and_Technology", "Science and technology"),
    ("Engineering", "Engineering and technology"),
    ("Mathematics", "Mathematics"),
    ("Physics", "Physics"),
    ("Chemistry", "Chemistry and biochemistry"),
    ("Biology", "Biology"),
    ("Earth_Agricultural_Farming", "Earth sciences, agriculture and farming"),
    ("Research_Methods_Statistics_Information_Sys", "Research methods, statistics and information systems"),
    ("Environmental_Issues", "Environmental issues"),
    ("History", "History"),
    ("American_History", "American history"),
    ("British_History", "British history"),
    ("European_History", "European history"),
    ("Ancient_History", "Ancient history"),
    ("Medieval_Middle_Ages", "Medieval history"),
    ("Early_Modern_1450_1750", "Early modern history (c. 1450-1750)"),
    ("Modern_1750_plus", "Modern history (1750+)"),
    ("Religious_History", "Religious history"),
    ("Royalty_History", "Royalty"),
    ("Warfare_History", "Warfare"),
    ("Schools_Universities_History", "Schools and universities"),
    ("History_Other", "History, other"),
    ("Archaeology_Anthropology", "Archaeology and anthropology"),
    ("Social_Sciences_Society", "Social sciences"),
    ("Business_Management", "Business and management"),
    ("Economics", "Economics"),
    ("Law_Criminology", "Law and criminology"),
    ("Gender_Sexuality_Studies", "Gender and sexuality studies"),
    ("Psychiatry_Psychology", "Psychiatry and psychology"),
    ("Sociology", "Sociology"),
    ("Politics", "Politics"),
    ("Parenthood_Family_Relations", "Parenthood and family relations"),
    ("Old_Age_Elderly", "Old age"),
    ("Arts_Culture", "Arts and culture"),
    ("Art", "Art"),
    ("Architecture", "Architecture"),
    ("Music", "Music"),
    ("Fashion", "Fashion"),
    ("Journalism_Media_Writing", "Journalism, media and writing"),
    ("Language_Communication", "Language and communication"),
    ("Essays_Letters_Speeches", "Essays, letters and speeches"),
    ("Religion_Philosophy", "Religion and philosophy"),
    ("Religion_Spirituality", "Religion and spirituality"),
    ("Philosophy_Ethics", "Philosophy and ethics"),
    ("Lifestyle_Hobbies", "Lifestyle and hobbies"),
    ("Cooking_Drinking", "Cooking and drinking"),
    ("Sports_Hobbies", "Sports and hobbies"),
    ("How_To", "How to"),
    ("Travel_Writing", "Travel writing"),
    ("Nature_Gardening_Animals", "Nature, gardening and animals"),
    ("Sexuality_Erotica", "Sexuality and erotica"),
    ("Health_Medicine", "Health and medicine"),
    ("Drugs_Alcohol_Pharmacology", "Drugs, alcohol and pharmacology"),
    ("Nutrition", "Nutrition"),
    ("Education_Reference", "Education and reference"),
    ("Encyclopedias_Dictionaries_Reference", "Encyclopedias and dictionaries"),
    ("Teaching_Education", "Teaching"),
    ("Reports_Conference_Proceedings", "Reports and conference proceedings"),
    ("Journals", "Journals"),
];
