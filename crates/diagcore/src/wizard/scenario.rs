//! Scenario catalogue
//!
//! Six fixed problem narratives. Each one maps to exactly one [`Insight`];
//! the lookup is an exhaustive `match`, so a missing entry is a compile error.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, IntoEnumIterator};
use thiserror::Error;

/// One of the predefined scenarios a visitor can pick.
///
/// On the wire (and in the scenario buttons' attribute) scenarios are the
/// strings `"1"` to `"6"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScenarioId {
    #[strum(serialize = "1")]
    ProjectInCrisis,
    #[strum(serialize = "2")]
    LaunchPreparation,
    #[strum(serialize = "3")]
    ImportSubstitution,
    #[strum(serialize = "4")]
    ContractorCheck,
    #[strum(serialize = "5")]
    DigitalMaturity,
    #[strum(serialize = "6")]
    BudgetReview,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scenario id: {0:?}")]
pub struct UnknownScenario(pub String);

/// Scenario-specific content shown after selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insight {
    /// Rich text (HTML fragment)
    pub display_text: &'static str,
    /// Label of the button leading to the contact form
    pub call_to_action_label: &'static str,
}

impl ScenarioId {
    /// Numeric id used by the scenario buttons and the backend
    pub fn number(self) -> u8 {
        match self {
            Self::ProjectInCrisis => 1,
            Self::LaunchPreparation => 2,
            Self::ImportSubstitution => 3,
            Self::ContractorCheck => 4,
            Self::DigitalMaturity => 5,
            Self::BudgetReview => 6,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::iter().find(|s| s.number() == n)
    }

    /// Short human-readable title (used in lead titles and menus)
    pub fn title(self) -> &'static str {
        match self {
            Self::ProjectInCrisis => "Проект в кризисе",
            Self::LaunchPreparation => "Подготовка запуска ИТ-проекта",
            Self::ImportSubstitution => "Импортозамещение и стратегия",
            Self::ContractorCheck => "Проверка подрядчика и команды",
            Self::DigitalMaturity => "Цифровая зрелость бизнеса",
            Self::BudgetReview => "Проверка бюджета проекта (CFO)",
        }
    }

    /// The insight for this scenario. Never fails.
    pub fn insight(self) -> Insight {
        match self {
            Self::ProjectInCrisis => Insight {
                display_text: "<ul><li>80% кризисных проектов можно было спасти, если бы проблемы увидели на 2–3 месяца раньше.</li>\
                               <li>Главные симптомы: сдвиг сроков без пересмотра плана и «зелёные» отчёты при растущем бэклоге.</li></ul>",
                call_to_action_label: "Получить чек-лист «10 признаков»",
            },
            Self::LaunchPreparation => Insight {
                display_text: "<ul><li>70% проектов проваливаются ещё до старта — из-за размытых целей и отсутствия критериев успеха.</li>\
                               <li>Ошибки на этапе подготовки обходятся в 5–10 раз дороже, чем их профилактика.</li></ul>",
                call_to_action_label: "Получить чек-лист «5 ошибок»",
            },
            Self::ImportSubstitution => Insight {
                display_text: "<ul><li>7 из 10 компаний выбирают софт для импортозамещения по презентации, а не по сценариям бизнеса.</li>\
                               <li>Стоимость миграции обычно недооценивают в 2 раза.</li></ul>",
                call_to_action_label: "Получить чек-лист «7 ошибок импортозамещения»",
            },
            Self::ContractorCheck => Insight {
                display_text: "<ul><li>Подрядчик считает часы, а не результат — и это видно по отчётам.</li>\
                               <li>Пять сигналов помогут понять, что команда работает на процесс, а не на цель.</li></ul>",
                call_to_action_label: "Получить чек-лист «5 сигналов»",
            },
            Self::DigitalMaturity => Insight {
                display_text: "<ul><li>Конкуренты уже автоматизировали рутину, пока вы согласовываете таблицы в почте.</li>\
                               <li>Цифровая зрелость измеряется скоростью решений, а не количеством систем.</li></ul>",
                call_to_action_label: "Получить чек-лист «5 признаков»",
            },
            Self::BudgetReview => Insight {
                display_text: "<ul><li>ROI никто не считает — бюджет ИТ-проекта растёт, а эффект остаётся гипотезой.</li>\
                               <li>Семь признаков показывают, где деньги уходят без результата.</li></ul>",
                call_to_action_label: "Получить чек-лист «7 признаков»",
            },
        }
    }
}

impl FromStr for ScenarioId {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_number)
            .ok_or_else(|| UnknownScenario(s.to_string()))
    }
}

impl TryFrom<String> for ScenarioId {
    type Error = UnknownScenario;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScenarioId> for String {
    fn from(id: ScenarioId) -> Self {
        id.to_string()
    }
}
