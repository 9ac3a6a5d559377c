//! ラベル正規化モジュール
//!
//! 画像分類モデルが返す生ラベル（例: `"Corn___Common_Rust"`）を
//! 作物名・病名の組（フランス語表示名）に変換する。
//!
//! ## 判定順序
//! 1. 辞書の完全一致
//! 2. `"___"` 区切りの分解と作物名の正規化
//! 3. キーワード走査（区切りがない場合のみ）
//! 4. 複合パターンによる病名の上書き（3の後に順に適用）
//!
//! どの入力に対してもエラーにならず、判定できない場合は
//! プレースホルダー（[`CROP_UNKNOWN`] / [`DISEASE_UNKNOWN`]）を返す。

use serde::{Deserialize, Serialize};

/// 作物不明
pub const CROP_UNKNOWN: &str = "Culture Inconnue";
/// 病名不明
pub const DISEASE_UNKNOWN: &str = "Condition Inconnue";
/// 植物の葉以外の画像
pub const INVALID: &str = "Invalide";
/// 健全
pub const HEALTHY: &str = "Sain";

const DELIMITER: &str = "___";

/// 辞書エントリ（生ラベル → 作物・病名）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropDiseaseEntry {
    pub key: &'static str,
    pub crop: &'static str,
    pub disease: &'static str,
}

const fn entry(key: &'static str, crop: &'static str, disease: &'static str) -> CropDiseaseEntry {
    CropDiseaseEntry { key, crop, disease }
}

/// 分類モデルの既知ラベル（小文字）
pub static CROP_DISEASE_MAP: &[CropDiseaseEntry] = &[
    entry("corn___common_rust", "Maïs", "Rouille Commune"),
    entry("corn___gray_leaf_spot", "Maïs", "Tache Grise des Feuilles"),
    entry("corn___healthy", "Maïs", HEALTHY),
    entry("corn___northern_leaf_blight", "Maïs", "Brûlure du Nord des Feuilles"),
    entry("potato___early_blight", "Pomme de terre", "Mildiou Précoce"),
    entry("potato___healthy", "Pomme de terre", HEALTHY),
    entry("potato___late_blight", "Pomme de terre", "Mildiou Tardif"),
    entry("rice___brown_spot", "Riz", "Tache Brune"),
    entry("rice___healthy", "Riz", HEALTHY),
    entry("rice___leaf_blast", "Riz", "Pyriculariose"),
    entry("wheat___brown_rust", "Blé", "Rouille Brune"),
    entry("wheat___healthy", "Blé", HEALTHY),
    entry("wheat___yellow_rust", "Blé", "Rouille Jaune"),
    entry("invalid", INVALID, INVALID),
];

/// 作物キーワード（部分一致・先勝ち）
static CROP_KEYWORDS: &[(&str, &str)] = &[
    ("corn", "Maïs"),
    ("potato", "Pomme de terre"),
    ("rice", "Riz"),
    ("wheat", "Blé"),
    ("invalid", INVALID),
];

/// 病名キーワード（部分一致・先勝ち）
///
/// 走査対象は空白で分割した単語なので、`_` を含むキーは単語に一致しない。
/// 複合名は後段の上書きパターンで拾う。
static DISEASE_KEYWORDS: &[(&str, &str)] = &[
    ("common_rust", "Rouille Commune"),
    ("gray_leaf_spot", "Tache Grise des Feuilles"),
    ("healthy", HEALTHY),
    ("leaf_blight", "Brûlure des Feuilles"),
    ("northern_leaf_blight", "Brûlure du Nord des Feuilles"),
    ("invalid", INVALID),
    ("unknown", DISEASE_UNKNOWN),
    ("early_blight", "Mildiou Précoce"),
    ("late_blight", "Mildiou Tardif"),
    ("brown_spot", "Tache Brune"),
    ("blast", "Pyriculariose"),
    ("brown_rust", "Rouille Brune"),
    ("yellow_rust", "Rouille Jaune"),
];

/// 区切り形式の作物名 → 表示名（完全一致）
static CROP_CANONICAL: &[(&str, &str)] = &[
    ("Corn Maize", "Maïs"),
    ("Corn", "Maïs"),
    ("Pepper Bell", "Poivron"),
    ("Cherry Including Sour", "Cerise"),
    ("Potato", "Pomme de terre"),
    ("Rice", "Riz"),
    ("Wheat", "Blé"),
];

/// 病名の上書きパターン（全キーワードを含めば上書き）
///
/// 順に評価し、途中で打ち切らない。複数一致した場合は最後の一致が残る。
static DISEASE_OVERRIDES: &[(&[&str], &str)] = &[
    (&["early", "blight"], "Mildiou Précoce"),
    (&["late", "blight"], "Mildiou Tardif"),
    (&["leaf", "spot"], "Tache des Feuilles"),
    (&["mosaic"], "Virus de la Mosaïque"),
    (&["blast"], "Pyriculariose"),
    (&["leaf", "blight"], "Brûlure des Feuilles"),
    (&["brown", "rust"], "Rouille Brune"),
    (&["yellow", "rust"], "Rouille Jaune"),
    (&["northern", "leaf", "blight"], "Brûlure des Feuilles"),
    (&["brown", "spot"], "Tache Brune"),
];

/// 正規化結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLabel {
    pub crop: String,
    pub disease: String,
}

impl ParsedLabel {
    pub fn new(crop: impl Into<String>, disease: impl Into<String>) -> Self {
        Self {
            crop: crop.into(),
            disease: disease.into(),
        }
    }

    /// 健全判定
    pub fn is_healthy(&self) -> bool {
        self.disease == HEALTHY
    }

    /// 葉以外の画像と判定されたか
    pub fn is_invalid(&self) -> bool {
        self.crop == INVALID || self.disease == INVALID
    }

    /// 作物・病名とも判定できなかったか
    pub fn is_unrecognized(&self) -> bool {
        self.crop == CROP_UNKNOWN && self.disease == DISEASE_UNKNOWN
    }
}

impl Default for ParsedLabel {
    fn default() -> Self {
        Self::new(CROP_UNKNOWN, DISEASE_UNKNOWN)
    }
}

/// 生ラベルを作物名・病名に正規化する
///
/// # Examples
/// ```
/// use terralys_common::parse_label;
///
/// let parsed = parse_label("corn___healthy");
/// assert_eq!(parsed.crop, "Maïs");
/// assert_eq!(parsed.disease, "Sain");
/// ```
pub fn parse_label(raw: &str) -> ParsedLabel {
    let label = raw.trim().to_lowercase();

    if let Some(entry) = lookup(&label) {
        return ParsedLabel::new(entry.crop, entry.disease);
    }

    if let Some(parsed) = parse_delimited(&label) {
        return parsed;
    }

    let mut parsed = scan_keywords(&label);
    apply_overrides(&label, &mut parsed.disease);
    parsed
}

/// 辞書の完全一致
pub fn lookup(label: &str) -> Option<&'static CropDiseaseEntry> {
    CROP_DISEASE_MAP.iter().find(|e| e.key == label)
}

/// `"作物___病名"` 形式を分解
///
/// 区切りで正確に2つの空でないセグメントに分かれる場合のみ対象。
fn parse_delimited(label: &str) -> Option<ParsedLabel> {
    if !label.contains(DELIMITER) {
        return None;
    }

    let segments: Vec<&str> = label.split(DELIMITER).collect();
    if segments.len() != 2 {
        return None;
    }

    let crop = clean_segment(segments[0]);
    let disease = clean_segment(segments[1]);
    if crop.is_empty() || disease.is_empty() {
        return None;
    }

    Some(ParsedLabel {
        crop: canonical_crop(crop),
        disease,
    })
}

/// `_` → 空白、単語の先頭を大文字化、括弧を除去
fn clean_segment(segment: &str) -> String {
    let spaced = segment.replace('_', " ");
    let titled = title_case(&spaced);
    let stripped: String = titled.chars().filter(|c| *c != '(' && *c != ')').collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 英数字の連続を単語とみなし、その先頭文字を大文字にする
fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if at_word_start && c.is_alphanumeric() {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        at_word_start = !c.is_alphanumeric();
    }

    result
}

fn canonical_crop(crop: String) -> String {
    CROP_CANONICAL
        .iter()
        .find(|(name, _)| *name == crop)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(crop)
}

/// 区切りのないラベルをキーワードで走査
fn scan_keywords(label: &str) -> ParsedLabel {
    let spaced = label.replace(['-', '_'], " ");
    let words: Vec<&str> = spaced.split_whitespace().collect();

    let crop = first_keyword_match(&words, CROP_KEYWORDS).unwrap_or(CROP_UNKNOWN);
    let disease = first_keyword_match(&words, DISEASE_KEYWORDS).unwrap_or(DISEASE_UNKNOWN);

    ParsedLabel::new(crop, disease)
}

fn first_keyword_match(words: &[&str], table: &[(&str, &'static str)]) -> Option<&'static str> {
    words.iter().find_map(|word| {
        table
            .iter()
            .find(|(keyword, _)| word.contains(keyword))
            .map(|(_, value)| *value)
    })
}

fn apply_overrides(label: &str, disease: &mut String) {
    for (patterns, replacement) in DISEASE_OVERRIDES {
        if patterns.iter().all(|p| label.contains(p)) {
            *disease = replacement.to_string();
        }
    }
}
