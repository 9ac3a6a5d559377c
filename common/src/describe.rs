//! 診断説明文の生成
//!
//! 正規化済みの（作物, 病名）から利用者向けの説明文を組み立てる。
//! 病名に含まれるキーワードで病害カテゴリを判定し、カテゴリごとの定型文を使う。

use crate::labels::{ParsedLabel, HEALTHY};
use serde::{Deserialize, Serialize};

/// 病害カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseCategory {
    Healthy,
    /// 疫病・べと病（mildiou）
    Blight,
    /// 斑点病（tache）
    Spot,
    /// さび病（rouille）
    Rust,
    /// いもち病（blast）
    Blast,
    Other,
}

/// 判定順（先勝ち）
static CATEGORY_KEYWORDS: &[(&str, DiseaseCategory)] = &[
    ("mildiou", DiseaseCategory::Blight),
    ("tache", DiseaseCategory::Spot),
    ("rouille", DiseaseCategory::Rust),
    ("blast", DiseaseCategory::Blast),
];

impl DiseaseCategory {
    /// 病名からカテゴリを判定
    pub fn of(disease: &str) -> Self {
        if disease == HEALTHY {
            return DiseaseCategory::Healthy;
        }

        let lower = disease.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, category)| *category)
            .unwrap_or(DiseaseCategory::Other)
    }

    /// 表示名
    pub fn label(&self) -> &'static str {
        match self {
            DiseaseCategory::Healthy => "Sain",
            DiseaseCategory::Blight => "Mildiou",
            DiseaseCategory::Spot => "Tache foliaire",
            DiseaseCategory::Rust => "Rouille",
            DiseaseCategory::Blast => "Pyriculariose",
            DiseaseCategory::Other => "Autre",
        }
    }
}

impl std::fmt::Display for DiseaseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 作物・病名から説明文を生成
///
/// # Examples
/// ```
/// use terralys_common::describe;
///
/// let text = describe("Blé", "Sain");
/// assert!(text.contains("Blé"));
/// assert!(text.contains("bonne santé"));
/// ```
pub fn describe(crop: &str, disease: &str) -> String {
    match DiseaseCategory::of(disease) {
        DiseaseCategory::Healthy => format!(
            "Excellente nouvelle : votre culture de {crop} est en bonne santé. \
             Aucun symptôme de maladie n'a été détecté sur la feuille analysée. \
             Continuez à surveiller régulièrement vos plants et à maintenir de bonnes \
             pratiques culturales (irrigation adaptée, rotation des cultures, fertilisation équilibrée)."
        ),
        DiseaseCategory::Blight => format!(
            "{disease} est une maladie de type mildiou qui touche la culture de {crop}. \
             Elle est causée par des micro-organismes qui prolifèrent par temps chaud et humide \
             et provoque des taches brunes à noires sur les feuilles, pouvant s'étendre \
             rapidement à toute la plante. Une intervention rapide limite les pertes de rendement."
        ),
        DiseaseCategory::Spot => format!(
            "{disease} est une maladie foliaire observée sur la culture de {crop}. \
             Elle se manifeste par des taches sur les feuilles qui réduisent la surface \
             photosynthétique et affaiblissent la plante. Elle est favorisée par l'humidité \
             prolongée du feuillage et se propage par les éclaboussures et les débris infectés."
        ),
        DiseaseCategory::Rust => format!(
            "{disease} est une maladie fongique de type rouille qui affecte la culture de {crop}. \
             Elle forme des pustules orangées à brunes sur les feuilles et les tiges, dont les \
             spores sont dispersées par le vent sur de longues distances. Les attaques sévères \
             réduisent fortement le rendement."
        ),
        DiseaseCategory::Blast => format!(
            "{disease} est une maladie fongique grave (pyriculariose) de la culture de {crop}. \
             Elle provoque des lésions en forme de losange sur les feuilles et peut atteindre \
             le cou des panicules, entraînant des pertes importantes de grains."
        ),
        DiseaseCategory::Other => format!(
            "Condition détectée sur la culture de {crop} : {disease}. \
             Consultez un agronome ou un service de vulgarisation agricole pour confirmer \
             le diagnostic et définir un plan de traitement adapté."
        ),
    }
}

/// [`ParsedLabel`] から説明文を生成
pub fn describe_label(parsed: &ParsedLabel) -> String {
    describe(&parsed.crop, &parsed.disease)
}
