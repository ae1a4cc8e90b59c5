use crate::language::Language;
use crate::session::CardFace;

/// A major arcana card with its bilingual texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TarotCard {
    pub number: u8,
    pub name_en: &'static str,
    pub name_zh: &'static str,
    pub image: &'static str,
    pub meaning_en: &'static str,
    pub meaning_zh: &'static str,
}

impl TarotCard {
    pub fn name(&self, lang: Language) -> &'static str {
        match lang {
            Language::En => self.name_en,
            Language::Zh => self.name_zh,
        }
    }

    pub fn meaning(&self, lang: Language) -> &'static str {
        match lang {
            Language::En => self.meaning_en,
            Language::Zh => self.meaning_zh,
        }
    }

    /// The card as it appears in a transcript.
    pub fn face(&self, lang: Language) -> CardFace {
        CardFace {
            name: self.name(lang).to_string(),
            image: self.image.to_string(),
            meaning: self.meaning(lang).to_string(),
        }
    }
}

pub static MAJOR_ARCANA: [TarotCard; 22] = [
    TarotCard {
        number: 0,
        name_en: "The Fool",
        name_zh: "愚者",
        image: "https://upload.wikimedia.org/wikipedia/commons/9/90/RWS_Tarot_00_Fool.jpg",
        meaning_en: "New beginnings, spontaneity, a leap of faith",
        meaning_zh: "新的开始、自由、勇敢的一跃",
    },
    TarotCard {
        number: 1,
        name_en: "The Magician",
        name_zh: "魔术师",
        image: "https://upload.wikimedia.org/wikipedia/commons/d/de/RWS_Tarot_01_Magician.jpg",
        meaning_en: "Willpower, skill, manifestation",
        meaning_zh: "意志、技巧、化想法为现实",
    },
    TarotCard {
        number: 2,
        name_en: "The High Priestess",
        name_zh: "女祭司",
        image: "https://upload.wikimedia.org/wikipedia/commons/8/88/RWS_Tarot_02_High_Priestess.jpg",
        meaning_en: "Intuition, mystery, inner knowledge",
        meaning_zh: "直觉、神秘、内在的智慧",
    },
    TarotCard {
        number: 3,
        name_en: "The Empress",
        name_zh: "皇后",
        image: "https://upload.wikimedia.org/wikipedia/commons/d/d2/RWS_Tarot_03_Empress.jpg",
        meaning_en: "Abundance, nurturing, fertility",
        meaning_zh: "丰盛、滋养、孕育",
    },
    TarotCard {
        number: 4,
        name_en: "The Emperor",
        name_zh: "皇帝",
        image: "https://upload.wikimedia.org/wikipedia/commons/c/c3/RWS_Tarot_04_Emperor.jpg",
        meaning_en: "Authority, structure, stability",
        meaning_zh: "权威、秩序、稳定",
    },
    TarotCard {
        number: 5,
        name_en: "The Hierophant",
        name_zh: "教皇",
        image: "https://upload.wikimedia.org/wikipedia/commons/8/8d/RWS_Tarot_05_Hierophant.jpg",
        meaning_en: "Tradition, guidance, belief",
        meaning_zh: "传统、指引、信仰",
    },
    TarotCard {
        number: 6,
        name_en: "The Lovers",
        name_zh: "恋人",
        image: "https://upload.wikimedia.org/wikipedia/commons/3/3a/TheLovers.jpg",
        meaning_en: "Love, harmony, meaningful choices",
        meaning_zh: "爱情、和谐、重要的抉择",
    },
    TarotCard {
        number: 7,
        name_en: "The Chariot",
        name_zh: "战车",
        image: "https://upload.wikimedia.org/wikipedia/commons/9/9b/RWS_Tarot_07_Chariot.jpg",
        meaning_en: "Control, willpower, victory",
        meaning_zh: "掌控、意志、胜利",
    },
    TarotCard {
        number: 8,
        name_en: "Strength",
        name_zh: "力量",
        image: "https://upload.wikimedia.org/wikipedia/commons/f/f5/RWS_Tarot_08_Strength.jpg",
        meaning_en: "Courage, patience, inner strength",
        meaning_zh: "勇气、耐心、内在的力量",
    },
    TarotCard {
        number: 9,
        name_en: "The Hermit",
        name_zh: "隐士",
        image: "https://upload.wikimedia.org/wikipedia/commons/4/4d/RWS_Tarot_09_Hermit.jpg",
        meaning_en: "Reflection, solitude, inner guidance",
        meaning_zh: "反思、独处、内心的指引",
    },
    TarotCard {
        number: 10,
        name_en: "Wheel of Fortune",
        name_zh: "命运之轮",
        image: "https://upload.wikimedia.org/wikipedia/commons/3/3c/RWS_Tarot_10_Wheel_of_Fortune.jpg",
        meaning_en: "Cycles, fate, turning points",
        meaning_zh: "循环、命运、转折点",
    },
    TarotCard {
        number: 11,
        name_en: "Justice",
        name_zh: "正义",
        image: "https://upload.wikimedia.org/wikipedia/commons/3/3f/RWS_Tarot_11_Justice.jpg",
        meaning_en: "Fairness, truth, cause and effect",
        meaning_zh: "公正、真相、因果",
    },
    TarotCard {
        number: 12,
        name_en: "The Hanged Man",
        name_zh: "倒吊人",
        image: "https://upload.wikimedia.org/wikipedia/commons/2/2b/RWS_Tarot_12_Hanged_Man.jpg",
        meaning_en: "Surrender, a new perspective, pause",
        meaning_zh: "放下、新的视角、暂停",
    },
    TarotCard {
        number: 13,
        name_en: "Death",
        name_zh: "死神",
        image: "https://upload.wikimedia.org/wikipedia/commons/d/d7/RWS_Tarot_13_Death.jpg",
        meaning_en: "Endings, transformation, transition",
        meaning_zh: "结束、蜕变、过渡",
    },
    TarotCard {
        number: 14,
        name_en: "Temperance",
        name_zh: "节制",
        image: "https://upload.wikimedia.org/wikipedia/commons/f/f8/RWS_Tarot_14_Temperance.jpg",
        meaning_en: "Balance, moderation, patience",
        meaning_zh: "平衡、节制、耐心",
    },
    TarotCard {
        number: 15,
        name_en: "The Devil",
        name_zh: "恶魔",
        image: "https://upload.wikimedia.org/wikipedia/commons/5/55/RWS_Tarot_15_Devil.jpg",
        meaning_en: "Attachment, temptation, shadow self",
        meaning_zh: "执念、诱惑、阴影",
    },
    TarotCard {
        number: 16,
        name_en: "The Tower",
        name_zh: "高塔",
        image: "https://upload.wikimedia.org/wikipedia/commons/5/53/RWS_Tarot_16_Tower.jpg",
        meaning_en: "Sudden change, upheaval, revelation",
        meaning_zh: "突变、动荡、顿悟",
    },
    TarotCard {
        number: 17,
        name_en: "The Star",
        name_zh: "星星",
        image: "https://upload.wikimedia.org/wikipedia/commons/d/db/RWS_Tarot_17_Star.jpg",
        meaning_en: "Hope, renewal, inspiration",
        meaning_zh: "希望、重生、灵感",
    },
    TarotCard {
        number: 18,
        name_en: "The Moon",
        name_zh: "月亮",
        image: "https://upload.wikimedia.org/wikipedia/commons/7/7f/RWS_Tarot_18_Moon.jpg",
        meaning_en: "Illusion, dreams, the subconscious",
        meaning_zh: "幻象、梦境、潜意识",
    },
    TarotCard {
        number: 19,
        name_en: "The Sun",
        name_zh: "太阳",
        image: "https://upload.wikimedia.org/wikipedia/commons/1/17/RWS_Tarot_19_Sun.jpg",
        meaning_en: "Joy, success, vitality",
        meaning_zh: "喜悦、成功、活力",
    },
    TarotCard {
        number: 20,
        name_en: "Judgement",
        name_zh: "审判",
        image: "https://upload.wikimedia.org/wikipedia/commons/d/dd/RWS_Tarot_20_Judgement.jpg",
        meaning_en: "Rebirth, reckoning, inner calling",
        meaning_zh: "重生、觉醒、内心的召唤",
    },
    TarotCard {
        number: 21,
        name_en: "The World",
        name_zh: "世界",
        image: "https://upload.wikimedia.org/wikipedia/commons/f/ff/RWS_Tarot_21_World.jpg",
        meaning_en: "Completion, fulfilment, wholeness",
        meaning_zh: "圆满、成就、完整",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_is_numbered_in_order() {
        for (i, card) in MAJOR_ARCANA.iter().enumerate() {
            assert_eq!(card.number as usize, i);
            assert!(card.image.starts_with("https://"));
        }
    }

    #[test]
    fn test_face_follows_language() {
        let star = &MAJOR_ARCANA[17];
        assert_eq!(star.face(Language::En).name, "The Star");
        assert_eq!(star.face(Language::Zh).name, "星星");
    }
}
