//! Static advice content, selected by age bracket or returned verbatim.
//!
//! Pure lookup tables; no state, no I/O.

/// Nap schedule advice by age bracket.
pub fn nap_schedule(age_months: u32) -> &'static str {
    if age_months <= 3 {
        "😴 **0-3 mois : 4-5 siestes**\n\nCourtes et fréquentes"
    } else if age_months <= 6 {
        "😴 **4-6 mois : 3 siestes**\n\nFenêtre 2-2h30 entre chaque"
    } else if age_months <= 12 {
        "😴 **7-12 mois : 2 siestes**\n\nMatin + après-midi"
    } else {
        "😴 **12+ mois : 1 sieste**\n\n12h30-13h (2-3h)"
    }
}

/// Ideal evening routine.
pub fn bedtime_routine() -> &'static str {
    "🌙 **Routine du soir idéale**\n\n\
     18h30 : Repas calme\n\
     19h : Bain tiède\n\
     19h15 : Pyjama\n\
     19h20 : Histoire/berceuse\n\
     19h30 : Coucher\n\n\
     💡 Même ordre chaque soir !"
}

/// What to do on a night waking at the given time.
pub fn night_waking_protocol(time: &str) -> String {
    format!(
        "⏰ **Réveil à {time}**\n\n\
         🔍 **Actions :**\n\
         → Vérifier couche\n\
         → Rassurer calmement\n\
         → Pas de grande lumière\n\
         → Retour au lit rapide"
    )
}

/// Emergency protocol for a screaming baby.
pub fn crisis_protocol() -> &'static str {
    "🆘 **Protocole Anti-Crise**\n\n\
     ✅ **Vérifications (30 sec)**\n\
     □ Couche ? Faim ? Froid/chaud ?\n\n\
     ✅ **Apaisement**\n\
     → Prends-le contre toi\n\
     → Balancement doux\n\
     → Chuchote \"chhhh\"\n\n\
     💡 Tu fais de ton mieux ❤️"
}

/// Teething, regressions, illness, travel.
pub fn special_situations() -> &'static str {
    "🌊 **Situations spéciales**\n\n\
     🦷 **DENTS** : Douleur = réveils (3-7 jours)\n\
     📉 **RÉGRESSION 4 MOIS** : Cycles (2-4 sem)\n\
     🤒 **MALADIE** : Priorité confort\n\
     ✈️ **VOYAGE** : Adapter progressivement\n\n\
     💡 Maintiens la routine = repère #1"
}

/// Daily routine skeleton.
pub fn daily_routine() -> &'static str {
    "📋 **Routine journalière**\n\n\
     7h : Réveil\n\
     Siestes adaptées\n\
     19h30 : Coucher\n\n\
     Utilise /siestes pour détails."
}

/// Daily tips, rotated deterministically by day of year.
const DAILY_TIPS: [&str; 5] = [
    "🌙 Bébé qui dort bien = bébé qui mange bien",
    "💡 Régularité > perfection",
    "😴 Bébé trop fatigué = dort moins bien",
    "🌡️ Température idéale : 19-20°C",
    "💤 Endormissement autonome = clé",
];

/// Tip of the day. Same day, same tip.
pub fn tip_of_day(day_of_year: u32) -> &'static str {
    DAILY_TIPS[day_of_year as usize % DAILY_TIPS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nap_schedule_brackets_match_the_ideal_table() {
        assert!(nap_schedule(3).contains("0-3 mois"));
        assert!(nap_schedule(4).contains("4-6 mois"));
        assert!(nap_schedule(12).contains("7-12 mois"));
        assert!(nap_schedule(13).contains("12+ mois"));
    }

    #[test]
    fn night_waking_protocol_echoes_the_time() {
        assert!(night_waking_protocol("2h30").contains("Réveil à 2h30"));
    }

    #[test]
    fn tip_of_day_is_stable_and_total() {
        assert_eq!(tip_of_day(1), tip_of_day(1));
        for day in 0..=366 {
            let _ = tip_of_day(day);
        }
    }
}
