//! Keyword-driven marketing tips and card icons.
//!
//! Both lookups are ordered tables evaluated top to bottom against the
//! lower-cased product name; the first group with a matching keyword wins.
//! Reordering the tables changes output.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MarketingTips {
    pub selling_point: &'static str,
    pub audience: &'static str,
    pub pricing: &'static str,
    pub channel: &'static str,
}

#[derive(Debug)]
pub struct TipCategory {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub tips: MarketingTips,
}

pub const TIP_CATEGORIES: &[TipCategory] = &[
    TipCategory {
        name: "audio",
        keywords: &["airpods", "headphone", "earbuds", "bluetooth"],
        tips: MarketingTips {
            selling_point: "音质清晰 + 无线便携 + 长续航",
            audience: "通勤族、运动爱好者、远程办公人群",
            pricing: "突出性价比，对标品牌价格8折",
            channel: "短视频开箱测评、科技博主合作",
        },
    },
    TipCategory {
        name: "kitchen",
        keywords: &["kitchen", "scale", "cooking"],
        tips: MarketingTips {
            selling_point: "精准便捷 + 厨房必备 + 高性价比",
            audience: "烘焙爱好者、健康饮食人群、新手厨师",
            pricing: "低价引流款，建议¥39-69",
            channel: "美食博主搭配食谱推荐",
        },
    },
    TipCategory {
        name: "cleaning",
        keywords: &["soap", "clean", "wash"],
        tips: MarketingTips {
            selling_point: "天然成分 + 香氛怡人 + 环保补充装",
            audience: "注重生活品质的家庭用户",
            pricing: "中端价位¥39-59",
            channel: "家居生活类 KOL、小红书种草",
        },
    },
    TipCategory {
        name: "skincare",
        keywords: &["skincare", "toner", "pad", "beauty"],
        tips: MarketingTips {
            selling_point: "韩国护肤科技 + 毛孔清洁神器",
            audience: "18-35岁女性、韩妆爱好者",
            pricing: "中高端¥99-169",
            channel: "美妆博主测评、抖音带货直播",
        },
    },
    TipCategory {
        name: "fitness",
        keywords: &["dumbbell", "fitness", "sport", "gym"],
        tips: MarketingTips {
            selling_point: "舒适握感 + 家用健身必备",
            audience: "居家健身人群、健身初学者",
            pricing: "性价比路线¥59-99",
            channel: "健身博主推荐、运动类社群",
        },
    },
    TipCategory {
        name: "drinkware",
        keywords: &["bottle", "water", "cup"],
        tips: MarketingTips {
            selling_point: "保温保冷 + 便携设计 + 高颜值",
            audience: "户外运动爱好者、上班族",
            pricing: "中端¥89-159",
            channel: "运动户外社群、健身房合作",
        },
    },
    TipCategory {
        name: "device_cases",
        keywords: &["case", "cover", "protect"],
        tips: MarketingTips {
            selling_point: "保护设备 + 多款颜色 + 超低价",
            audience: "数码产品用户、配件收集者",
            pricing: "低价爆款¥19.9-39.9",
            channel: "电商首页推荐、买正品送配件活动",
        },
    },
];

pub const GENERIC_TIPS: MarketingTips = MarketingTips {
    selling_point: "品质保证 + 性价比高",
    audience: "大众消费者",
    pricing: "参考市场同类产品定价",
    channel: "多平台推广、社交媒体种草",
};

/// Icon groups. Deliberately narrower than the tip keywords ("bluetooth"
/// alone earns audio tips but the generic icon).
pub const ICONS: &[(&[&str], &str)] = &[
    (&["airpods", "headphone", "earbuds"], "🎧"),
    (&["kitchen", "scale"], "⚖️"),
    (&["soap", "clean"], "🧴"),
    (&["skincare", "toner", "beauty"], "💊"),
    (&["dumbbell", "fitness"], "🏋️"),
    (&["bottle", "water"], "🥤"),
    (&["case", "cover"], "📱"),
];

pub const GENERIC_ICON: &str = "📦";

fn matches_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| name.contains(keyword))
}

/// First category whose keywords appear in `product_name`, if any.
pub fn categorize(product_name: &str) -> Option<&'static TipCategory> {
    let name = product_name.to_lowercase();
    TIP_CATEGORIES
        .iter()
        .find(|category| matches_any(&name, category.keywords))
}

pub fn advise(product_name: &str) -> &'static MarketingTips {
    categorize(product_name)
        .map(|category| &category.tips)
        .unwrap_or(&GENERIC_TIPS)
}

pub fn icon_for(product_name: &str) -> &'static str {
    let name = product_name.to_lowercase();
    ICONS
        .iter()
        .find(|(keywords, _)| matches_any(&name, keywords))
        .map(|(_, icon)| *icon)
        .unwrap_or(GENERIC_ICON)
}
