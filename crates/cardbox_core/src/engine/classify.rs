//! Weighted keyword classification into the four-color taxonomy.
//!
//! # Responsibility
//! - Score each unit against the ordered rule table and pick a category.
//! - Derive a heuristic confidence in `[0, 1]`.
//! - Extract a short display title from the unit's leading text.
//!
//! # Invariants
//! - Only the four fixed categories are ever produced.
//! - Ties on match count resolve in rule-table order (first rule wins).
//! - Zero matches fall back to a uniformly random category at 0.5.
//! - Title extraction is pure and independent of category assignment.

use crate::engine::rng::RandomSource;
use crate::model::card::Category;

/// Classifier output for one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    /// `min(1.0, base + 0.1 * matches)`, or 0.5 on random fallback.
    pub confidence: f64,
    /// Display title derived from the unit's leading text.
    pub title: String,
}

struct Rule {
    category: Category,
    base_confidence: f64,
    keywords: &'static [&'static str],
}

// Keyword lists carry the English terms plus their Chinese equivalents;
// the source corpus is bilingual. ASCII keywords are stored lowercase and
// matched against the lowercased unit.
const RULES: [Rule; 4] = [
    Rule {
        category: Category::CoreConcept,
        base_confidence: 0.85,
        keywords: &[
            "theory", "concept", "model", "framework", "principle", "method", "strategy",
            "paradigm", "system", "理论", "概念", "模型", "框架", "原理", "方法", "策略", "范式",
            "体系", "系统",
        ],
    },
    Rule {
        category: Category::Link,
        base_confidence: 0.80,
        keywords: &[
            "association",
            "connection",
            "link",
            "relation",
            "integrate",
            "compare",
            "contrast",
            "similar",
            "联想",
            "联系",
            "连接",
            "关联",
            "整合",
            "比较",
            "对比",
            "相似",
        ],
    },
    Rule {
        category: Category::Reference,
        base_confidence: 0.90,
        keywords: &[
            "reference", "source", "citation", "literature", "document", "url", "article", "book",
            "research", "参考", "来源", "引用", "文献", "文档", "文章", "书籍", "研究",
        ],
    },
    Rule {
        category: Category::Keyword,
        base_confidence: 0.75,
        keywords: &[
            "definition",
            "term",
            "keyword",
            "index",
            "tag",
            "classification",
            "type",
            "category",
            "定义",
            "术语",
            "关键词",
            "索引",
            "标签",
            "分类",
            "类型",
            "类别",
        ],
    },
];

const FALLBACK_CONFIDENCE: f64 = 0.5;
const CONFIDENCE_STEP: f64 = 0.1;
const TITLE_SCAN_CHARS: usize = 50;
const TITLE_MAX_CHARS: usize = 30;
const TITLE_ELLIPSIS: char = '…';

/// Classifies one non-empty unit.
///
/// The segmenter guarantees non-empty input; classification itself never
/// fails, the random fallback covers units with no keyword match.
pub fn classify(unit: &str, rng: &mut dyn RandomSource) -> Classification {
    let lowered = unit.to_lowercase();

    let mut best_matches = 0usize;
    let mut best_rule: Option<&Rule> = None;
    for rule in &RULES {
        let matches = rule
            .keywords
            .iter()
            .filter(|keyword| lowered.contains(**keyword))
            .count();
        // Strictly greater: earlier rules win ties by construction.
        if matches > best_matches {
            best_matches = matches;
            best_rule = Some(rule);
        }
    }

    let (category, confidence) = match best_rule {
        Some(rule) => (
            rule.category,
            (rule.base_confidence + CONFIDENCE_STEP * best_matches as f64).min(1.0),
        ),
        None => {
            let index = rng.pick(Category::ALL.len() as u32) as usize;
            (Category::ALL[index], FALLBACK_CONFIDENCE)
        }
    };

    Classification {
        category,
        confidence,
        title: extract_title(unit),
    }
}

/// Derives a short display title from the unit's leading text.
///
/// Rules (char-counted, CJK-safe):
/// - Take the prefix up to and including the first `.` when one occurs
///   within the first 50 characters, otherwise the first 50 characters.
/// - A prefix longer than 30 characters is cut to 30 plus an ellipsis.
/// - A single trailing `.` is stripped.
pub fn extract_title(unit: &str) -> String {
    let window: String = unit.chars().take(TITLE_SCAN_CHARS).collect();
    let prefix: &str = match window.find('.') {
        Some(dot_index) => &window[..=dot_index],
        None => window.as_str(),
    };

    if prefix.chars().count() > TITLE_MAX_CHARS {
        let mut title: String = prefix.chars().take(TITLE_MAX_CHARS).collect();
        title.push(TITLE_ELLIPSIS);
        return title;
    }

    prefix.strip_suffix('.').unwrap_or(prefix).to_string()
}
