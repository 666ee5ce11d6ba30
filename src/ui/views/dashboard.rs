// src/ui/views/dashboard.rs
//
// Panel del profesor: resumen, analíticas, ajustes e informes.

use crate::analytics::{RecommendationKind, display_name};
use crate::app::{DashboardTab, PhonicsApp};
use crate::settings::{MAX_QUESTIONS, MIN_QUESTIONS, SettingChange};
use crate::ui::layout::scroll_panel;
use egui::{Color32, Context, Grid, ProgressBar, RichText, Slider, Ui};

pub fn ui_dashboard(app: &mut PhonicsApp, ctx: &Context) {
    scroll_panel(ctx, 680.0, |ui| {
        ui.add_space(12.0);
        ui.heading("📊 لوحة المعلم");
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            for tab in DashboardTab::ALL {
                ui.selectable_value(&mut app.dashboard_tab, tab, tab.label());
            }
        });
        ui.separator();

        match app.dashboard_tab {
            DashboardTab::Overview => overview(app, ui),
            DashboardTab::Analytics => analytics(app, ui),
            DashboardTab::Settings => settings(app, ui, ctx),
            DashboardTab::Reports => reports(app, ui, ctx),
        }
    });
}

fn stat(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui| {
        ui.label(RichText::new(value).size(28.0).strong());
        ui.label(label);
    });
}

fn overview(app: &PhonicsApp, ui: &mut Ui) {
    let p = app.progress.progress();
    let analytics = &p.analytics;
    ui.horizontal_wrapped(|ui| {
        stat(
            ui,
            "مهارات متقنة",
            format!("{}/{}", app.mastered_count(), app.curriculum.techniques().len()),
        );
        ui.add_space(24.0);
        stat(ui, "نسبة الإنجاز", format!("{}%", app.completion_rate()));
        ui.add_space(24.0);
        stat(ui, "النقاط", p.points.to_string());
        ui.add_space(24.0);
        stat(ui, "أيام متتالية", p.streak.to_string());
    });
    ui.add_space(16.0);
    ui.horizontal_wrapped(|ui| {
        stat(ui, "ساعات التعلم", format!("{:.1}", analytics.total_hours()));
        ui.add_space(24.0);
        stat(ui, "جلسات مكتملة", analytics.sessions_completed.to_string());
        ui.add_space(24.0);
        stat(
            ui,
            "متوسط الدقة",
            format!("{}%", (analytics.average_accuracy * 100.0).round() as u32),
        );
    });
}

fn analytics(app: &PhonicsApp, ui: &mut Ui) {
    let analytics = &app.progress.progress().analytics;
    let days = analytics.last_7_days(app.progress.today());
    let max = days.iter().map(|(_, m)| *m).max().unwrap_or(0).max(1);

    ui.label(RichText::new("⏱ دقائق التعلم في آخر 7 أيام").strong());
    Grid::new("last_7_days").num_columns(2).show(ui, |ui| {
        for (day, minutes) in &days {
            ui.label(day.format("%m-%d").to_string());
            ui.add(
                ProgressBar::new(*minutes as f32 / max as f32)
                    .desired_width(360.0)
                    .text(format!("{minutes} د")),
            );
            ui.end_row();
        }
    });

    ui.add_space(16.0);
    areas(ui, "⚠ مناطق تحتاج تحسين", &analytics.weak_areas, Color32::from_rgb(210, 70, 60));
    ui.add_space(8.0);
    areas(ui, "⭐ نقاط القوة", &analytics.strong_areas, Color32::from_rgb(40, 160, 70));
}

fn areas(ui: &mut Ui, title: &str, ids: &[String], color: Color32) {
    ui.label(RichText::new(title).strong());
    if ids.is_empty() {
        ui.label("لا يوجد بعد");
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for id in ids {
            ui.colored_label(color, display_name(id));
        }
    });
}

fn settings(app: &mut PhonicsApp, ui: &mut Ui, ctx: &Context) {
    let current = app.progress.settings().clone();
    let mut changes = Vec::new();

    let mut questions = current.questions_per_session;
    if ui
        .add(Slider::new(&mut questions, MIN_QUESTIONS..=MAX_QUESTIONS).text("عدد الأسئلة في الجلسة"))
        .changed()
    {
        changes.push(SettingChange::QuestionsPerSession(questions));
    }

    let mut passing = current.passing_score;
    if ui
        .add(
            Slider::new(&mut passing, 0.5..=1.0)
                .step_by(0.05)
                .custom_formatter(|v, _| format!("{}%", (v * 100.0).round()))
                .text("درجة النجاح"),
        )
        .changed()
    {
        changes.push(SettingChange::PassingScore(passing));
    }

    let mut hints = current.enable_hints;
    if ui.checkbox(&mut hints, "💡 إظهار التلميحات").changed() {
        changes.push(SettingChange::EnableHints(hints));
    }
    let mut auto_advance = current.auto_advance;
    if ui.checkbox(&mut auto_advance, "⏭ الانتقال التلقائي للسؤال التالي").changed() {
        changes.push(SettingChange::AutoAdvance(auto_advance));
    }
    let mut paced = current.paced_lessons;
    if ui.checkbox(&mut paced, "📖 دروس تفاعلية خطوة بخطوة").changed() {
        changes.push(SettingChange::PacedLessons(paced));
    }

    for change in changes {
        app.change_setting(change);
    }

    ui.add_space(16.0);
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("📤 تصدير البيانات").clicked() {
            app.copy_export(ctx);
        }
        if ui
            .button(RichText::new("🗑 إعادة تعيين التقدم").color(Color32::from_rgb(210, 70, 60)))
            .clicked()
        {
            app.confirm_reset = true;
        }
    });
}

fn reports(app: &mut PhonicsApp, ui: &mut Ui, ctx: &Context) {
    let report = app.progress_report();

    Grid::new("technique_report")
        .num_columns(4)
        .striped(true)
        .show(ui, |ui| {
            ui.label(RichText::new("المهارة").strong());
            ui.label(RichText::new("الحالة").strong());
            ui.label(RichText::new("الخطوات").strong());
            ui.label(RichText::new("الوقت").strong());
            ui.end_row();
            for t in &report.techniques {
                ui.label(&t.name);
                ui.label(if t.mastered { "✅ متقن" } else { "⏳ قيد التعلم" });
                ui.label(format!("{}/{}", t.completed_steps, t.total_steps));
                ui.label(format!("{} دقيقة", t.minutes));
                ui.end_row();
            }
        });
    if report.techniques.is_empty() {
        ui.label("لم يبدأ الطالب أي مهارة بعد.");
    }

    ui.add_space(16.0);
    ui.label(RichText::new("💬 التوصيات").strong());
    for r in report.recommendations() {
        let color = match r.kind {
            RecommendationKind::Improvement => Color32::from_rgb(200, 120, 0),
            RecommendationKind::Strength => Color32::from_rgb(40, 160, 70),
        };
        ui.colored_label(color, RichText::new(&r.title).strong());
        ui.label(&r.description);
        ui.add_space(4.0);
    }

    ui.add_space(16.0);
    if ui.button("📋 نسخ التقرير").clicked() {
        app.copy_report(ctx);
    }
}
