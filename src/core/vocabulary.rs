//! Bilingual vocabulary used to compare display-language words with the
//! English labels recognizers emit.
//!
//! The table is built once per process and never mutated afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

static VOCABULARY: OnceLock<Vocabulary> = OnceLock::new();

/// `display term -> canonical matching term`.
const ENTRIES: &[(&str, &str)] = &[
    // animals
    ("猫", "cat"),
    ("狗", "dog"),
    ("鸟", "bird"),
    ("鱼", "fish"),
    ("大象", "elephant"),
    ("狮子", "lion"),
    ("老虎", "tiger"),
    ("熊", "bear"),
    ("蛇", "snake"),
    ("兔子", "rabbit"),
    ("猴子", "monkey"),
    ("长颈鹿", "giraffe"),
    // food
    ("苹果", "apple"),
    ("香蕉", "banana"),
    ("披萨", "pizza"),
    ("汉堡", "hamburger"),
    ("寿司", "sushi"),
    ("冰淇淋", "ice cream"),
    ("蛋糕", "cake"),
    ("意大利面", "spaghetti"),
    ("巧克力", "chocolate"),
    ("咖啡", "coffee"),
    // movies
    ("泰坦尼克号", "titanic"),
    ("盗梦空间", "inception"),
    ("阿凡达", "avatar"),
    ("黑客帝国", "the matrix"),
    ("星球大战", "star wars"),
    ("教父", "the godfather"),
    ("侏罗纪公园", "jurassic park"),
    ("狮子王", "the lion king"),
    // countries
    ("美国", "united states"),
    ("中国", "china"),
    ("日本", "japan"),
    ("法国", "france"),
    ("巴西", "brazil"),
    ("澳大利亚", "australia"),
    ("加拿大", "canada"),
    ("墨西哥", "mexico"),
    ("意大利", "italy"),
    ("德国", "germany"),
    // vehicles
    ("汽车", "car"),
    ("公交车", "bus"),
    ("自行车", "bicycle"),
    ("飞机", "airplane"),
    ("船", "boat"),
    ("火车", "train"),
    ("摩托车", "motorcycle"),
    ("直升机", "helicopter"),
    ("卡车", "truck"),
    // famous people
    ("爱因斯坦", "albert einstein"),
    ("玛丽莲·梦露", "marilyn monroe"),
    ("猫王", "elvis presley"),
    ("莎士比亚", "william shakespeare"),
    ("曼德拉", "nelson mandela"),
    ("迈克尔·杰克逊", "michael jackson"),
    ("麦当娜", "madonna"),
    // sports
    ("足球", "soccer ball"),
    ("篮球", "basketball"),
    ("网球", "tennis ball"),
    ("高尔夫", "golf ball"),
    ("游泳", "swimming"),
    ("拳击", "boxing glove"),
    ("排球", "volleyball"),
    // musical instruments
    ("吉他", "guitar"),
    ("钢琴", "piano"),
    ("小提琴", "violin"),
    ("鼓", "drum"),
    ("长笛", "flute"),
    ("小号", "trumpet"),
    ("萨克斯", "saxophone"),
    ("竖琴", "harp"),
];

/// Category-level labels a generic recognizer tends to return. None of them
/// equals a canonical term.
const REFERENCE_LABELS: &[&str] = &[
    "animal",
    "pet",
    "feline",
    "canine",
    "wild animal",
    "big cat",
    "primate",
    "reptile",
    "fruit",
    "dessert",
    "fast food",
    "noodle",
    "drink",
    "movie poster",
    "film",
    "flag",
    "map",
    "landmark",
    "vehicle",
    "wheel",
    "aircraft",
    "watercraft",
    "person",
    "portrait",
    "statue",
    "sports equipment",
    "ball",
    "racket",
    "glove",
    "musical instrument",
    "string instrument",
    "keyboard instrument",
    "wind instrument",
    "percussion",
];

#[derive(Debug, Clone)]
pub struct Vocabulary {
    forward: HashMap<String, &'static str>,
    reverse: HashMap<&'static str, &'static str>,
}

impl Vocabulary {
    pub fn from_entries(entries: &[(&'static str, &'static str)]) -> Self {
        let mut forward = HashMap::with_capacity(entries.len());
        let mut reverse = HashMap::with_capacity(entries.len());
        for &(term, canonical) in entries {
            forward.insert(term.to_lowercase(), canonical);
            reverse.entry(canonical).or_insert(term);
        }
        Self { forward, reverse }
    }

    /// Process-wide table, built on first use.
    pub fn global() -> &'static Vocabulary {
        VOCABULARY.get_or_init(|| Vocabulary::from_entries(ENTRIES))
    }

    /// Lower-cases `term` and maps it to its canonical form; unknown terms
    /// come back lower-cased but otherwise unchanged.
    pub fn translate(&self, term: &str) -> String {
        let key = term.to_lowercase();
        match self.forward.get(&key) {
            Some(canonical) => (*canonical).to_string(),
            None => key,
        }
    }

    pub fn reverse(&self, canonical: &str) -> Option<&'static str> {
        self.reverse.get(canonical.to_lowercase().as_str()).copied()
    }
}

pub fn translate(term: &str) -> String {
    Vocabulary::global().translate(term)
}

/// Reference labels the fallback path scores candidates against.
pub fn reference_pool() -> &'static [&'static str] {
    REFERENCE_LABELS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_terms() {
        assert_eq!(translate("猫"), "cat");
        assert_eq!(translate("冰淇淋"), "ice cream");
    }

    #[test]
    fn unknown_terms_fall_back_to_lowercase_identity() {
        assert_eq!(translate("Zebra"), "zebra");
        assert_eq!(translate(""), "");
    }

    #[test]
    fn reverse_lookup_finds_display_term() {
        let vocab = Vocabulary::global();
        assert_eq!(vocab.reverse("dog"), Some("狗"));
        assert_eq!(vocab.reverse("DOG"), Some("狗"));
        assert_eq!(vocab.reverse("zebra"), None);
    }

    #[test]
    fn custom_table_is_case_insensitive() {
        let vocab = Vocabulary::from_entries(&[("Chat", "cat")]);
        assert_eq!(vocab.translate("CHAT"), "cat");
        assert_eq!(vocab.translate("chien"), "chien");
    }

    #[test]
    fn reference_pool_has_no_duplicates() {
        let pool = reference_pool();
        let mut seen = std::collections::HashSet::new();
        assert!(pool.iter().all(|label| seen.insert(*label)));
        assert!(pool.contains(&"musical instrument"));
    }

    #[test]
    fn reference_pool_never_repeats_a_canonical_term() {
        let pool = reference_pool();
        for (_, canonical) in ENTRIES {
            assert!(!pool.contains(canonical), "{canonical} is in the reference pool");
        }
    }
}
