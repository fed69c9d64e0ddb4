//! Hint derivation for difficult records.
//!
//! The hint is chosen by the first of:
//!
//! 1. the record's own mnemonic, when it is short and reads like a phrase
//!    rather than a formula;
//! 2. a curated topic rule (named structures before generic framings);
//! 3. [`FALLBACK_HINT`].

use crate::domain::{
    ValidatedRecord,
    rule::{Predicate, Rule, first_match},
};

/// Mnemonics at or above this many characters are not used as hints.
pub const MNEMONIC_MAX_CHARS: usize = 60;

/// Hint used when no rule applies.
pub const FALLBACK_HINT: &str =
    "Relacione a estrutura com sua localização, função e correlação clínica.";

/// Derives hints from an ordered list of topic rules.
#[derive(Debug, Clone)]
pub struct HintDeriver {
    rules: Vec<Rule<&'static str>>,
}

impl Default for HintDeriver {
    fn default() -> Self {
        Self::new(standard_rules())
    }
}

impl HintDeriver {
    /// Creates a deriver from an explicit rule list.
    #[must_use]
    pub const fn new(rules: Vec<Rule<&'static str>>) -> Self {
        Self { rules }
    }

    /// Produces the hint for a record.
    #[must_use]
    pub fn derive(&self, record: &ValidatedRecord) -> String {
        if let Some(hint) = mnemonic_hint(record.mnemonic()) {
            return hint;
        }

        first_match(&self.rules, record).map_or_else(
            || FALLBACK_HINT.to_string(),
            |rule| {
                tracing::trace!(rule = rule.name(), "hint rule matched");
                (*rule.outcome()).to_string()
            },
        )
    }
}

/// Wraps a mnemonic as a hint, if it qualifies.
///
/// A mnemonic containing `=` is a formula, not a phrase, and is skipped.
#[must_use]
pub fn mnemonic_hint(mnemonic: &str) -> Option<String> {
    let mnemonic = mnemonic.trim();
    if mnemonic.is_empty() || mnemonic.contains('=') {
        return None;
    }
    if mnemonic.chars().count() >= MNEMONIC_MAX_CHARS {
        return None;
    }
    Some(format!("Mnemônico: {mnemonic}"))
}

/// The standard curated hint rules.
#[must_use]
pub fn standard_rules() -> Vec<Rule<&'static str>> {
    vec![
        // named structures
        Rule::new(
            "forame de monro",
            Predicate::tags(r"^forame-(de-)?monro$")
                .or(Predicate::question(r"forame (de )?monro|forame interventricular")),
            "Forame de Monro: comunica cada ventrículo lateral com o III ventrículo; \
             pense no fluxo do LCR e na hidrocefalia obstrutiva.",
        ),
        // named surgical approaches
        Rule::new(
            "pterional approach",
            Predicate::tags("pterional").or(Predicate::question(r"\bpterional\b")),
            "Acesso pterional: centrado no ptério, abre a fissura silviana e expõe o \
             polígono de Willis anterior.",
        ),
        Rule::new(
            "transsphenoidal approach",
            Predicate::tags("transesfenoidal")
                .or(Predicate::question(r"trans-?esfenoidal")),
            "Acesso transesfenoidal: via nasal até o seio esfenoidal e a sela túrcica; \
             lembre da hipófise e dos seios cavernosos laterais.",
        ),
        Rule::new(
            "retrosigmoid approach",
            Predicate::tags("retrossigmoide").or(Predicate::question(r"retros?sigm[oó]ide")),
            "Acesso retrossigmóide: atrás do seio sigmóide, expõe o ângulo \
             ponto-cerebelar e os nervos VII e VIII.",
        ),
        // named syndromes
        Rule::new(
            "wallenberg syndrome",
            Predicate::tags("wallenberg").or(Predicate::question(r"wallenberg|bulbar lateral")),
            "Wallenberg: bulbo lateral (PICA/vertebral); dor e temperatura cruzadas, \
             Horner ipsilateral, disfagia.",
        ),
        Rule::new(
            "weber syndrome",
            Predicate::tags("weber").or(Predicate::question(r"\bweber\b")),
            "Weber: mesencéfalo ventral; III nervo ipsilateral e hemiparesia \
             contralateral.",
        ),
        Rule::new(
            "parinaud syndrome",
            Predicate::tags("parinaud").or(Predicate::question(r"parinaud")),
            "Parinaud: compressão do teto mesencefálico (pineal); paralisia do olhar \
             vertical para cima.",
        ),
        // named vascular territories
        Rule::new(
            "middle cerebral artery",
            Predicate::tags(r"^acm$|cerebral-media")
                .or(Predicate::question(r"cerebral m[ée]dia|\bACM\b")),
            "Artéria cerebral média: face lateral do hemisfério; face e membro superior, \
             linguagem no hemisfério dominante.",
        ),
        Rule::new(
            "anterior cerebral artery",
            Predicate::tags(r"^aca$|cerebral-anterior")
                .or(Predicate::question(r"cerebral anterior|\bACA\b")),
            "Artéria cerebral anterior: face medial do hemisfério; membro inferior \
             contralateral.",
        ),
        Rule::new(
            "posterior cerebral artery",
            Predicate::tags(r"^acp$|cerebral-posterior")
                .or(Predicate::question(r"cerebral posterior|\bACP\b")),
            "Artéria cerebral posterior: lobo occipital e tálamo; hemianopsia \
             homônima contralateral.",
        ),
        Rule::new(
            "posterior inferior cerebellar artery",
            Predicate::tags(r"^pica$").or(Predicate::question(r"\bPICA\b|cerebelar inferior posterior")),
            "PICA: bulbo lateral e face inferior do cerebelo; pense em Wallenberg.",
        ),
        // framings
        Rule::new(
            "herniation",
            Predicate::tags(r"hernia").or(Predicate::question(r"h[ée]rnia|herniação")),
            "Hérnia: identifique o que se desloca, sob qual borda (foice, tenda, forame \
             magno) e o que é comprimido.",
        ),
        Rule::new(
            "clinical case",
            Predicate::tags("caso-clinico")
                .or(Predicate::question(r"^\s*caso\b|caso cl[ií]nico|\bpaciente\b")),
            "Caso clínico: localize a lesão pelos sinais (nível, lado, estruturas \
             vizinhas) antes de nomear a estrutura.",
        ),
        Rule::new(
            "true or false",
            Predicate::tags("verdadeiro-falso")
                .or(Predicate::question(r"verdadeiro ou falso|^\s*v\s+ou\s+f\b|\(\s*v\s*/\s*f\s*\)")),
            "V/F: procure a palavra que torna a afirmação falsa (sempre, nunca, apenas, \
             todos).",
        ),
        Rule::new(
            "surgical approach",
            Predicate::tags(r"acesso|abordagem")
                .or(Predicate::question(r"\bacessos?\b|\babordage[mn]s?\b|craniotomia")),
            "Acesso cirúrgico: pense no corredor anatômico, no que é afastado e no que \
             corre risco.",
        ),
        Rule::new(
            "syndrome",
            Predicate::tags("sindrome").or(Predicate::question(r"s[ií]ndrome")),
            "Síndrome: associe cada sinal a uma estrutura lesada e deduza o nível da \
             lesão.",
        ),
        Rule::new(
            "vascular territory",
            Predicate::tags(r"vascularizacao|territorio").or(Predicate::question(r"art[ée]ria|irriga")),
            "Território vascular: lembre a artéria, o ramo e o déficit típico da \
             oclusão.",
        ),
        Rule::new(
            "variation",
            Predicate::tags("variaco?es").or(Predicate::question(r"%|varia[çc][ãa]o")),
            "Variação anatômica: lembre a apresentação mais frequente e sua \
             porcentagem aproximada.",
        ),
        Rule::new(
            "comparison",
            Predicate::tags(r"comparacao|integrad").or(Predicate::question(
                r"\bcompare\b|\bcompara[çc][ãa]o\b|diferen[çc]as? entre|\bversus\b|\bvs\.?\s",
            )),
            "Comparação: liste as diferenças lado a lado (localização, função, \
             irrigação, lesão).",
        ),
        Rule::new(
            "list item",
            Predicate::tags("item-lista").or(Predicate::question(r"\(\s*\d+\s*/\s*\d+\s*\)")),
            "Item de lista: recorde a lista completa e a posição deste item nela.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::Tags;

    fn derive(question: &str, tags: &str, mnemonic: &str) -> String {
        let record = ValidatedRecord::new(question, "answer", Tags::parse(tags), mnemonic).unwrap();
        HintDeriver::default().derive(&record)
    }

    fn hint_for(name: &str) -> &'static str {
        standard_rules()
            .into_iter()
            .find(|rule| rule.name() == name)
            .map(|rule| *rule.outcome())
            .unwrap()
    }

    #[test]
    fn short_mnemonic_wins() {
        assert_eq!(
            derive("CASO: x", "forame-monro", "Monro une os ventrículos"),
            "Mnemônico: Monro une os ventrículos"
        );
    }

    #[test]
    fn formula_mnemonic_is_skipped() {
        assert_eq!(
            derive("CASO: x", "forame-monro", "PPC = PAM - PIC"),
            hint_for("forame de monro")
        );
    }

    #[test]
    fn long_mnemonic_is_skipped() {
        let long = "a".repeat(MNEMONIC_MAX_CHARS);
        assert_eq!(derive("q", "", &long), FALLBACK_HINT);

        let just_short_enough = "a".repeat(MNEMONIC_MAX_CHARS - 1);
        assert_eq!(
            derive("q", "", &just_short_enough),
            format!("Mnemônico: {just_short_enough}")
        );
    }

    #[test]
    fn whitespace_mnemonic_is_ignored() {
        assert_eq!(derive("q", "", "   "), FALLBACK_HINT);
    }

    #[test_case("CASO: Paciente com lesão", "forame-monro", "forame de monro"; "monro tag beats case framing")]
    #[test_case("Onde fica o forame interventricular?", "", "forame de monro"; "monro question")]
    #[test_case("Descreva o acesso pterional", "", "pterional approach"; "pterional")]
    #[test_case("Riscos da via transesfenoidal", "", "transsphenoidal approach"; "transsphenoidal")]
    #[test_case("Acesso retrossigmóide", "", "retrosigmoid approach"; "retrosigmoid")]
    #[test_case("Síndrome de Wallenberg", "", "wallenberg syndrome"; "wallenberg")]
    #[test_case("Síndrome de Weber", "", "weber syndrome"; "weber")]
    #[test_case("Síndrome de Parinaud", "", "parinaud syndrome"; "parinaud")]
    #[test_case("Oclusão da artéria cerebral média", "", "middle cerebral artery"; "acm")]
    #[test_case("Território da ACA", "", "anterior cerebral artery"; "aca")]
    #[test_case("Lesão da cerebral posterior", "", "posterior cerebral artery"; "acp")]
    #[test_case("Ramos da PICA", "", "posterior inferior cerebellar artery"; "pica")]
    #[test_case("Hérnia uncal comprime o quê?", "", "herniation"; "hernia")]
    #[test_case("Estrutura", "hernias", "herniation"; "hernia tag")]
    #[test_case("CASO: dor súbita", "", "clinical case"; "case")]
    #[test_case("Verdadeiro ou falso: x", "", "true or false"; "true false")]
    #[test_case("Qual a abordagem do III ventrículo?", "", "surgical approach"; "generic approach")]
    #[test_case("Estrutura", "sindromes", "syndrome"; "syndrome tag")]
    #[test_case("Estrutura", "vascularizacao", "vascular territory"; "vascular tag")]
    #[test_case("Em 30% dos casos", "", "variation"; "percentage")]
    #[test_case("Estrutura", "variacoes-anatomicas", "variation"; "variation tag")]
    #[test_case("Compare tálamo e hipotálamo", "", "comparison"; "comparison")]
    #[test_case("Núcleos da base (2/5)", "", "list item"; "list item question")]
    #[test_case("Estrutura", "item-lista", "list item"; "list item tag")]
    fn topic_rules(question: &str, tags: &str, rule: &str) {
        assert_eq!(derive(question, tags, ""), hint_for(rule));
    }

    #[test]
    fn unmatched_record_gets_fallback() {
        assert_eq!(derive("Estrutura qualquer", "anatomia", ""), FALLBACK_HINT);
    }

    #[test]
    fn derivation_is_pure() {
        let record =
            ValidatedRecord::new("Síndrome de Weber", "a", Tags::default(), "").unwrap();
        let deriver = HintDeriver::default();
        assert_eq!(deriver.derive(&record), deriver.derive(&record));
    }
}
