//! Reply text building.
//!
//! All user-facing strings live here, Markdown-formatted for the chat
//! transport. Rendering is pure; the router decides what to send.

use crate::domain::diagnostic::{
    DiagnosticAnswers, NapVerdict, SleepAssessment, Stage, WakeVerdict,
};
use crate::domain::foundation::Timestamp;

pub fn welcome(display_name: Option<&str>) -> String {
    format!(
        "👋 Bonjour {} !\n\n\
         Bienvenue sur **Coach Sommeil™** 🌙\n\n\
         🔹 **Commandes disponibles :**\n\n\
         📊 /diagnostic - Analyse complète\n\
         😴 /siestes - Horaires idéaux\n\
         🌙 /coucher - Routine du soir\n\
         ⏰ /reveil - Décoder un réveil\n\
         🆘 /crise - Protocole d'urgence\n\
         🌊 /regression - Situations spéciales\n\
         📋 /routine - Routine selon l'âge\n\
         💡 /conseil - Conseil du jour\n\
         ❓ /help - Toutes les commandes\n\n\
         ✨ **Premium (9,90€/mois)** : /premium\n\n\
         💪 Prêt(e) à retrouver des nuits paisibles ?",
        display_name.unwrap_or("toi")
    )
}

pub fn help_text() -> &'static str {
    "📖 **Commandes Coach Sommeil™**\n\n\
     🔍 /diagnostic - Questionnaire guidé\n\
     📅 /siestes <âge> - Ex: /siestes 6\n\
     📋 /routine <âge> - Ex: /routine 8\n\
     🌙 /coucher - Routine du soir\n\
     ⏰ /reveil <heure> - Ex: /reveil 2h30\n\
     🆘 /crise - Bébé hurle\n\
     🌊 /regression - Situations spéciales\n\
     💡 /conseil - Conseil quotidien\n\
     ✨ /premium - Infos abonnement\n\
     📊 /status - Ton statut"
}

pub fn payment_success() -> &'static str {
    "✅ **Paiement réussi !**\n\n\
     Ton abonnement Premium sera activé dans quelques instants.\n\
     Tape /status pour vérifier."
}

pub fn payment_cancelled() -> &'static str {
    "❌ **Paiement annulé**\n\nTu peux réessayer avec /premium"
}

pub fn payment_error() -> &'static str {
    "❌ Erreur paiement. Réessaie plus tard."
}

pub fn storage_error() -> &'static str {
    "❌ Erreur technique. Réessaie ou tape /help"
}

pub fn premium_active(until: Option<&Timestamp>) -> String {
    let expiry = until
        .map(format_date)
        .unwrap_or_else(|| "—".to_string());
    format!(
        "✨ **Tu es abonné(e) Premium !**\n\n\
         📅 Actif jusqu'au : {expiry}\n\n\
         🎁 **Tes avantages :**\n\
         ✅ Diagnostic illimité\n\
         ✅ Conseils personnalisés\n\
         ✅ Contenus exclusifs\n\
         ✅ Support prioritaire\n\n\
         💚 Merci de ta confiance !"
    )
}

pub fn premium_offer() -> &'static str {
    "✨ **Coach Sommeil Premium**\n\n\
     💰 **9,90€/mois** - Sans engagement\n\n\
     🎁 **Avantages :**\n\
     ✅ Diagnostic illimité\n\
     ✅ Plan personnalisé\n\
     ✅ Conseils quotidiens adaptés\n\
     ✅ PDF et tableaux exclusifs\n\
     ✅ Support dédié\n\n\
     💳 **Paiement sécurisé Stripe**\n\
     → Résiliable en 1 clic\n\n\
     👇 Clique pour t'abonner :"
}

pub fn demo_activated() -> &'static str {
    "🎉 **Premium activé ! (DEMO)**\n\nTape /status pour voir ton abonnement."
}

pub fn status_unregistered() -> &'static str {
    "❌ Tape /start pour t'inscrire."
}

pub fn status_premium(until: Option<&Timestamp>) -> String {
    let expiry = until
        .map(format_date)
        .unwrap_or_else(|| "—".to_string());
    format!(
        "✅ **Statut : Premium Actif**\n\n\
         📅 Jusqu'au : {expiry}\n\
         💚 Toutes les fonctionnalités débloquées !"
    )
}

pub fn status_free() -> &'static str {
    "📊 **Statut : Version Gratuite**\n\n✨ Passe Premium : /premium"
}

/// Question asked when the session enters `stage`.
pub fn diagnostic_prompt(stage: Stage) -> &'static str {
    match stage {
        Stage::AwaitingAge => {
            "🔍 **Diagnostic - Étape 1/4**\n\n\
             Quel est l'âge de ton bébé ? (en mois)\n\
             Ex: 6, 12, 18..."
        }
        Stage::AwaitingNapCount => {
            "📅 **Diagnostic - Étape 2/4**\n\n\
             Combien de siestes par jour ?\n\
             Ex: 2, 3..."
        }
        Stage::AwaitingBedtime => {
            "🌙 **Diagnostic - Étape 3/4**\n\n\
             Heure du coucher le soir ?\n\
             Ex: 19h30, 20h..."
        }
        Stage::AwaitingWakeCount => {
            "😴 **Diagnostic - Étape 4/4**\n\n\
             Réveils nocturnes (nombre moyen) ?\n\
             Ex: 0, 2, 5..."
        }
        Stage::Complete => "",
    }
}

pub fn invalid_number() -> &'static str {
    "Merci d'entrer un nombre."
}

pub fn diagnostic_cancelled() -> &'static str {
    "Diagnostic annulé. Tape /diagnostic pour recommencer."
}

pub fn fallback_hint() -> &'static str {
    "❓ Je n'ai pas compris. Tape /help pour voir les commandes."
}

pub fn usage(command: &str, example: &str) -> String {
    format!("Usage : {command}\nEx: {example}")
}

/// Renders the completed diagnostic, appending the upsell notice for
/// non-premium users.
pub fn diagnostic_result(
    answers: &DiagnosticAnswers,
    assessment: &SleepAssessment,
    is_premium: bool,
) -> String {
    let mut result = format!(
        "✅ **Résultat du Diagnostic**\n\n\
         📋 **Situation :**\n\
         • Âge : {} mois\n\
         • Siestes : {}/jour\n\
         • Coucher : {}\n\
         • Réveils : {}/nuit\n\n\
         🔍 **Analyse :**",
        answers.age_months, answers.nap_count, answers.bedtime, answers.wake_count
    );

    match assessment.nap_verdict {
        NapVerdict::TooMany => {
            result.push_str(&format!(
                "\n⚠️ Trop de siestes. Idéal : {}",
                assessment.ideal_naps
            ));
        }
        NapVerdict::TooFew => {
            result.push_str(&format!(
                "\n💤 Besoin de plus de repos. Idéal : {}",
                assessment.ideal_naps
            ));
        }
        NapVerdict::OnTarget => {
            result.push_str("\n✅ Nombre de siestes adapté");
        }
    }

    match assessment.wake_verdict {
        WakeVerdict::Frequent => {
            result.push_str(
                "\n\n🌙 Réveils fréquents. Causes possibles :\n\
                 • Fenêtre de sommeil inadaptée\n\
                 • Coucher trop tardif",
            );
        }
        WakeVerdict::Normal => {
            result.push_str("\n\n🌙 Quelques réveils normaux, optimisables");
        }
        WakeVerdict::Excellent => {
            result.push_str("\n\n✨ Excellent ! Bébé dort bien");
        }
    }

    result.push_str(&format!(
        "\n\n💡 **Recommandations :**\n\
         → /routine {age}\n\
         → /siestes {age}\n\
         → /coucher",
        age = answers.age_months
    ));

    if !is_premium {
        result.push_str("\n\n✨ **Premium** : /premium");
    }

    result
}

fn format_date(ts: &Timestamp) -> String {
    ts.as_datetime().format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnostic::assess;

    fn answers() -> DiagnosticAnswers {
        DiagnosticAnswers {
            age_months: 6,
            nap_count: 2,
            bedtime: "19h30".to_string(),
            wake_count: 1,
        }
    }

    #[test]
    fn result_reports_too_few_naps_for_six_months_two_naps() {
        let answers = answers();
        let text = diagnostic_result(&answers, &assess(&answers), true);

        assert!(text.contains("💤 Besoin de plus de repos. Idéal : 3"));
        assert!(text.contains("🌙 Quelques réveils normaux, optimisables"));
        assert!(text.contains("→ /routine 6"));
    }

    #[test]
    fn upsell_appended_only_for_free_users() {
        let answers = answers();
        let assessment = assess(&answers);

        let free = diagnostic_result(&answers, &assessment, false);
        let premium = diagnostic_result(&answers, &assessment, true);

        assert!(free.contains("✨ **Premium** : /premium"));
        assert!(!premium.contains("✨ **Premium** : /premium"));
    }

    #[test]
    fn welcome_falls_back_when_name_missing() {
        assert!(welcome(None).contains("Bonjour toi"));
        assert!(welcome(Some("Léa")).contains("Bonjour Léa"));
    }

    #[test]
    fn premium_date_is_day_month_year() {
        use chrono::TimeZone;
        let ts = Timestamp::from_datetime(
            chrono::Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap(),
        );
        assert!(premium_active(Some(&ts)).contains("09/03/2026"));
    }

    #[test]
    fn every_live_stage_has_a_prompt() {
        for stage in [
            Stage::AwaitingAge,
            Stage::AwaitingNapCount,
            Stage::AwaitingBedtime,
            Stage::AwaitingWakeCount,
        ] {
            assert!(!diagnostic_prompt(stage).is_empty());
        }
    }
}
