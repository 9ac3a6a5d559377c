//! 定型の推奨事項
//!
//! 推奨生成モデルが使えない場合（未設定・無効化・呼び出し失敗）に使う。

use crate::describe::DiseaseCategory;
use crate::labels::ParsedLabel;

static HEALTHY: &[&str] = &[
    "Continuer l'inspection hebdomadaire des feuilles pour détecter tôt tout symptôme.",
    "Maintenir une irrigation régulière en évitant de mouiller le feuillage.",
    "Pratiquer la rotation des cultures pour limiter l'accumulation de pathogènes dans le sol.",
    "Apporter une fertilisation équilibrée adaptée au stade de la culture.",
];

static BLIGHT: &[&str] = &[
    "Retirer et détruire rapidement les feuilles et plants atteints, sans les composter.",
    "Éviter l'irrigation par aspersion et arroser au pied, de préférence le matin.",
    "Appliquer un fongicide homologué (par exemple à base de cuivre) en suivant l'étiquette.",
    "Espacer les plants pour améliorer la circulation de l'air et réduire l'humidité.",
    "Utiliser des semences ou tubercules certifiés et des variétés tolérantes.",
];

static SPOT: &[&str] = &[
    "Éliminer les feuilles tachées et les débris de culture en fin de saison.",
    "Limiter l'humidité du feuillage en évitant l'arrosage par le haut.",
    "Alterner les cultures pendant au moins deux saisons sur la parcelle touchée.",
    "Appliquer un fongicide adapté si les taches progressent vers les feuilles supérieures.",
];

static RUST: &[&str] = &[
    "Surveiller la progression des pustules, surtout par temps doux et humide.",
    "Appliquer un fongicide homologué contre la rouille dès les premiers symptômes.",
    "Semer des variétés résistantes à la rouille lors des prochaines campagnes.",
    "Détruire les repousses et plantes hôtes qui maintiennent l'inoculum.",
];

static BLAST: &[&str] = &[
    "Éviter les excès d'azote qui favorisent la pyriculariose.",
    "Maintenir une lame d'eau régulière dans les rizières.",
    "Appliquer un fongicide homologué au stade montaison si la pression est forte.",
    "Choisir des variétés résistantes et des semences saines.",
];

static OTHER: &[&str] = &[
    "Isoler les plants présentant des symptômes pour limiter la propagation.",
    "Prendre plusieurs photos nettes de feuilles atteintes pour confirmer le diagnostic.",
    "Consulter un agronome ou un service de vulgarisation agricole local.",
];

/// 作物・病名に応じた定型の推奨事項
pub fn fallback_recommendations(parsed: &ParsedLabel) -> Vec<String> {
    let items = match DiseaseCategory::of(&parsed.disease) {
        DiseaseCategory::Healthy => HEALTHY,
        DiseaseCategory::Blight => BLIGHT,
        DiseaseCategory::Spot => SPOT,
        DiseaseCategory::Rust => RUST,
        DiseaseCategory::Blast => BLAST,
        DiseaseCategory::Other if parsed.disease == "Pyriculariose" => BLAST,
        DiseaseCategory::Other => OTHER,
    };

    items.iter().map(|s| s.to_string()).collect()
}
