// src/analytics.rs
//
// Tiempo y precisión por sesión, agregados por día y por técnica,
// más el informe y las recomendaciones del panel.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::Technique;

pub const WEAK_THRESHOLD: f32 = 0.7;
pub const STRONG_THRESHOLD: f32 = 0.9;

const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;

/// Muestra de precisión. Las antiguas son un número suelto sin técnica.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum AccuracySample {
    Attributed { technique: String, value: f32 },
    Legacy(f32),
}

impl AccuracySample {
    pub fn value(&self) -> f32 {
        match self {
            AccuracySample::Attributed { value, .. } => *value,
            AccuracySample::Legacy(value) => *value,
        }
    }

    pub fn technique(&self) -> Option<&str> {
        match self {
            AccuracySample::Attributed { technique, .. } => Some(technique),
            AccuracySample::Legacy(_) => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyActivity {
    pub time_spent: i64,
    pub sessions_completed: u32,
    pub accuracy: Vec<AccuracySample>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Analytics {
    /// Milisegundos.
    pub total_time_spent: i64,
    pub sessions_completed: u32,
    pub average_accuracy: f32,
    pub time_by_technique: BTreeMap<String, i64>,
    pub daily_activity: BTreeMap<NaiveDate, DailyActivity>,
    pub weak_areas: Vec<String>,
    pub strong_areas: Vec<String>,
}

fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f32>() / values.len() as f32)
    }
}

impl Analytics {
    /// Suma una sesión terminada. Con `total == 0` solo cuenta el tiempo.
    pub fn record_session(
        &mut self,
        technique_id: &str,
        duration_ms: i64,
        today: NaiveDate,
        correct: usize,
        total: usize,
    ) {
        let duration_ms = duration_ms.max(0);
        self.total_time_spent += duration_ms;
        *self
            .time_by_technique
            .entry(technique_id.to_string())
            .or_insert(0) += duration_ms;

        let day = self.daily_activity.entry(today).or_default();
        day.time_spent += duration_ms;
        day.sessions_completed += 1;

        if total > 0 {
            day.accuracy.push(AccuracySample::Attributed {
                technique: technique_id.to_string(),
                value: correct as f32 / total as f32,
            });
            self.recompute_accuracy();
        }
        self.sessions_completed += 1;
    }

    fn samples(&self) -> impl Iterator<Item = &AccuracySample> {
        self.daily_activity.values().flat_map(|d| d.accuracy.iter())
    }

    /// Media global y zonas débiles/fuertes a partir de todas las muestras.
    pub fn recompute_accuracy(&mut self) {
        let all: Vec<f32> = self.samples().map(AccuracySample::value).collect();
        self.average_accuracy = mean(&all).unwrap_or(0.0);

        let mut by_technique: BTreeMap<&str, Vec<f32>> = BTreeMap::new();
        for sample in self.samples() {
            if let Some(id) = sample.technique() {
                by_technique.entry(id).or_default().push(sample.value());
            }
        }

        let mut weak = Vec::new();
        let mut strong = Vec::new();
        for (id, values) in &by_technique {
            let Some(avg) = mean(values) else { continue };
            if avg < WEAK_THRESHOLD {
                weak.push(id.to_string());
            } else if avg > STRONG_THRESHOLD {
                strong.push(id.to_string());
            }
        }
        self.weak_areas = weak;
        self.strong_areas = strong;
    }

    /// Minutos por día de los últimos siete días, el más antiguo primero.
    pub fn last_7_days(&self, today: NaiveDate) -> Vec<(NaiveDate, u32)> {
        (0..7)
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                let minutes = self
                    .daily_activity
                    .get(&date)
                    .map(|d| (d.time_spent as f64 / MS_PER_MINUTE).round() as u32)
                    .unwrap_or(0);
                (date, minutes)
            })
            .collect()
    }

    pub fn minutes_for(&self, technique_id: &str) -> u32 {
        let ms = self.time_by_technique.get(technique_id).copied().unwrap_or(0);
        (ms as f64 / MS_PER_MINUTE).round() as u32
    }

    pub fn total_hours(&self) -> f32 {
        ((self.total_time_spent as f64 / MS_PER_HOUR * 10.0).round() / 10.0) as f32
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechniqueReport {
    pub id: String,
    pub name: String,
    pub mastered: bool,
    pub minutes: u32,
    pub completed_steps: usize,
    pub total_steps: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub total_hours: f32,
    pub sessions_completed: u32,
    /// Porcentaje entero.
    pub average_accuracy: u32,
    pub current_streak: u32,
    pub total_points: u32,
    pub weak_areas: Vec<String>,
    pub strong_areas: Vec<String>,
    pub techniques: Vec<TechniqueReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationKind {
    Improvement,
    Strength,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
}

/// "magic_e" -> "Magic E", para técnicas que ya no están en el currículo.
pub fn display_name(id: &str) -> String {
    id.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn technique_name(id: &str, techniques: &[Technique]) -> String {
    techniques
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| display_name(id))
}

impl ProgressReport {
    pub fn recommendations(&self) -> Vec<Recommendation> {
        let mut out = Vec::new();
        if self.average_accuracy < 70 {
            out.push(Recommendation {
                kind: RecommendationKind::Improvement,
                title: "🎯 تحسين الدقة".into(),
                description: "ينصح بتكرار التمارين والتركيز على المهارات الأساسية".into(),
            });
        }
        if self.total_hours < 5.0 {
            out.push(Recommendation {
                kind: RecommendationKind::Improvement,
                title: "⏰ زيادة وقت التدريب".into(),
                description: "المزيد من الممارسة اليومية سيحسن النتائج".into(),
            });
        }
        if !self.strong_areas.is_empty() {
            out.push(Recommendation {
                kind: RecommendationKind::Strength,
                title: "⭐ نقاط القوة".into(),
                description: format!("أداء ممتاز في: {}", self.strong_areas.join("، ")),
            });
        }
        if self.current_streak > 7 {
            out.push(Recommendation {
                kind: RecommendationKind::Strength,
                title: "🔥 التزام ممتاز".into(),
                description: "الاستمرارية في التعلم تؤتي ثمارها!".into(),
            });
        }
        out
    }

    /// Versión en texto plano para copiar o guardar.
    pub fn to_text(&self, date: NaiveDate) -> String {
        let mut lines = vec![
            "تقرير تقدم تعلم الأصوات الإنجليزية".to_string(),
            "=====================================".to_string(),
            format!("تاريخ التقرير: {date}"),
            "ملخص الأداء:".to_string(),
            format!("- إجمالي وقت التعلم: {} ساعة", self.total_hours),
            format!("- عدد الجلسات المكتملة: {}", self.sessions_completed),
            format!("- متوسط الدقة: {}%", self.average_accuracy),
            format!("- النقاط المكتسبة: {}", self.total_points),
            format!("- سلسلة الأيام: {}", self.current_streak),
            "تفصيل المهارات:".to_string(),
        ];
        for t in &self.techniques {
            let status = if t.mastered {
                "مكتمل ✓".to_string()
            } else {
                format!("{}/{} خطوة", t.completed_steps, t.total_steps)
            };
            lines.push(format!("- {}: {} ({} دقيقة)", t.name, status, t.minutes));
        }
        if !self.strong_areas.is_empty() {
            lines.push("نقاط القوة:".into());
            lines.extend(self.strong_areas.iter().map(|a| format!("- {}", display_name(a))));
        }
        if !self.weak_areas.is_empty() {
            lines.push("مناطق تحتاج تحسين:".into());
            lines.extend(self.weak_areas.iter().map(|a| format!("- {}", display_name(a))));
        }
        lines.push("التوصيات:".into());
        lines.extend(
            self.recommendations()
                .iter()
                .map(|r| format!("- {}: {}", r.title, r.description)),
        );
        lines.join("\n")
    }
}
