use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROUND_SIZE: usize = 4;
const DEFAULT_CATEGORY: &str = "animals";

#[derive(Debug, Clone)]
pub struct Category {
    pub key: &'static str,
    pub display_name: &'static str,
    pub words: &'static [&'static str],
}

const CATEGORIES: &[Category] = &[
    Category {
        key: "animals",
        display_name: "动物",
        words: &[
            "猫", "狗", "鸟", "鱼", "大象", "狮子", "老虎", "熊", "蛇", "兔子", "猴子", "长颈鹿",
        ],
    },
    Category {
        key: "food",
        display_name: "食物",
        words: &[
            "苹果", "香蕉", "披萨", "汉堡", "寿司", "冰淇淋", "蛋糕", "意大利面", "巧克力", "咖啡",
        ],
    },
    Category {
        key: "movies",
        display_name: "电影",
        words: &[
            "泰坦尼克号", "盗梦空间", "阿凡达", "黑客帝国", "星球大战", "教父", "侏罗纪公园", "狮子王",
        ],
    },
    Category {
        key: "countries",
        display_name: "国家",
        words: &[
            "美国", "中国", "日本", "法国", "巴西", "澳大利亚", "加拿大", "墨西哥", "意大利", "德国",
        ],
    },
    Category {
        key: "vehicles",
        display_name: "交通工具",
        words: &[
            "汽车", "公交车", "自行车", "飞机", "船", "火车", "摩托车", "直升机", "卡车",
        ],
    },
    Category {
        key: "famous-people",
        display_name: "名人",
        words: &[
            "爱因斯坦", "玛丽莲·梦露", "猫王", "莎士比亚", "曼德拉", "迈克尔·杰克逊", "麦当娜",
        ],
    },
    Category {
        key: "sports",
        display_name: "运动",
        words: &[
            "足球", "篮球", "网球", "高尔夫", "游泳", "自行车", "拳击", "排球",
        ],
    },
    Category {
        key: "musical-instruments",
        display_name: "乐器",
        words: &[
            "吉他", "钢琴", "小提琴", "鼓", "长笛", "小号", "萨克斯", "竖琴",
        ],
    },
];

/// A category and the candidate words offered for one drawing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub category: String,
    pub display_name: String,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct WordBank {
    categories: &'static [Category],
}

impl WordBank {
    pub fn builtin() -> Self {
        Self {
            categories: CATEGORIES,
        }
    }

    pub fn categories(&self) -> &'static [Category] {
        self.categories
    }

    /// Unknown keys resolve to the animals category.
    pub fn category(&self, key: &str) -> &'static Category {
        let categories = self.categories;
        categories
            .iter()
            .find(|c| c.key == key)
            .or_else(|| categories.iter().find(|c| c.key == DEFAULT_CATEGORY))
            .unwrap_or(&categories[0])
    }

    /// Picks a category (random unless given) and up to `count` distinct
    /// words from it in shuffled order.
    pub fn new_round<R: Rng + ?Sized>(
        &self,
        category: Option<&str>,
        count: usize,
        rng: &mut R,
    ) -> Round {
        let categories = self.categories;
        let chosen = match category {
            Some(key) => self.category(key),
            None => categories
                .choose(rng)
                .unwrap_or_else(|| self.category(DEFAULT_CATEGORY)),
        };
        let mut words: Vec<String> = chosen.words.iter().map(|w| w.to_string()).collect();
        words.shuffle(rng);
        words.truncate(count);
        Round {
            category: chosen.key.to_string(),
            display_name: chosen.display_name.to_string(),
            words,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocabulary::Vocabulary;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn round_has_distinct_words_from_category() {
        let bank = WordBank::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let round = bank.new_round(Some("food"), DEFAULT_ROUND_SIZE, &mut rng);
        assert_eq!(round.category, "food");
        assert_eq!(round.display_name, "食物");
        assert_eq!(round.words.len(), 4);
        let category = bank.category("food");
        for word in &round.words {
            assert!(category.words.contains(&word.as_str()));
        }
        let mut deduped = round.words.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), round.words.len());
    }

    #[test]
    fn unknown_category_falls_back_to_animals() {
        let bank = WordBank::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let round = bank.new_round(Some("planets"), 3, &mut rng);
        assert_eq!(round.category, "animals");
        assert_eq!(round.words.len(), 3);
    }

    #[test]
    fn oversized_request_returns_whole_category() {
        let bank = WordBank::builtin();
        let mut rng = StdRng::seed_from_u64(3);
        let round = bank.new_round(Some("movies"), 100, &mut rng);
        assert_eq!(round.words.len(), 8);
    }

    #[test]
    fn round_serializes_display_name_in_camel_case() {
        let mut rng = StdRng::seed_from_u64(5);
        let round = WordBank::builtin().new_round(Some("sports"), 2, &mut rng);
        let json = serde_json::to_value(&round).unwrap();
        assert_eq!(json["displayName"], "运动");
        assert!(json.get("display_name").is_none());
        let back: Round = serde_json::from_value(json).unwrap();
        assert_eq!(back, round);
    }

    #[test]
    fn every_word_has_a_translation() {
        let vocab = Vocabulary::global();
        for category in WordBank::builtin().categories() {
            for word in category.words {
                assert_ne!(vocab.translate(word), *word, "missing translation for {word}");
            }
        }
    }
}
