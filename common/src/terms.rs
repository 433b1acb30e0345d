//! Static membership terms printed after the application form.

pub const TITLE: &str = "Membership Application Terms";

pub struct Clause {
    /// Numbering shown in bold, e.g. `1.` or `a.`.
    pub number: &'static str,
    pub title: Option<&'static str>,
    pub text: &'static str,
    pub bullets: &'static [&'static str],
}

pub const CLAUSES: &[Clause] = &[
    Clause {
        number: "1.",
        title: Some("Eligibility"),
        text: "Any natural person can become a member of the club. Members are obliged to support the interests of the club to the best of their ability and to refrain from anything that could harm the reputation or purpose of the club.",
        bullets: &[],
    },
    Clause {
        number: "a.",
        title: None,
        text: "The club has only a yearly membership model. Each member needs to submit a separate form.",
        bullets: &[],
    },
    Clause {
        number: "2.",
        title: Some("Admission"),
        text: "Admission is based on a written application and confirmation by the club. For minors, the consent of a legal guardian is required. If the application is rejected, the applicant (or the legal representative for minors) may appeal, to be decided by the honorary council.",
        bullets: &[],
    },
    Clause {
        number: "3.",
        title: Some("Elections"),
        text: "Eligible for election are adult and fully contributing members. Exceptions apply to youth representatives as defined by the youth regulations. Temporary members cannot be elected to offices.",
        bullets: &[],
    },
    Clause {
        number: "4.",
        title: Some("Membership Ends Through"),
        text: "",
        bullets: &["Resignation", "Death", "Expulsion"],
    },
    Clause {
        number: "5.",
        title: Some("Resignation"),
        text: "Resignation is possible only at the end of a calendar year and must be declared in writing to the board at least three months in advance. In justified cases, the board may allow exceptions. For minors, the resignation must be signed by a legal guardian.",
        bullets: &[],
    },
    Clause {
        number: "6.",
        title: Some("Penalties"),
        text: "The board and department heads may impose penalties on members for:",
        bullets: &[
            "Repeated deliberate violations of the statutes or the interests of the club",
            "Dishonorable conduct directly affecting club life and its reputation",
            "Non-payment of dues",
        ],
    },
    Clause {
        number: "7.",
        title: Some("Possible Measures"),
        text: "",
        bullets: &[
            "Reprimand",
            "Exclusion from club activities",
            "Fine (for adults); fines over €100 require board approval",
            "Expulsion from the club",
        ],
    },
    Clause {
        number: "8.",
        title: Some("Appeals"),
        text: "The member must be heard before any decision. Notification of expulsion must be sent by registered mail. Appeals must be submitted to the honorary council within two weeks. Their decision is final. Expelled members lose all rights to club assets.",
        bullets: &[],
    },
];

pub const CONTRIBUTIONS_TITLE: &str = "Contributions";

pub const CONTRIBUTIONS: &str = "The members' assembly or AGM determines membership fees, admission fees, and other charges. Contributions are payable annually in advance through the current collection procedure (SEPA-Lastschriftmandat). Contributions are due regardless of participation. Members in arrears for over a year must pay all back dues by March 31st of the current year.";

impl Clause {
    /// Bold lead-in, e.g. `1. Eligibility:`.
    pub fn heading(&self) -> String {
        match self.title {
            Some(title) => format!("{} {}:", self.number, title),
            None => self.number.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_numbered_clauses() {
        let numbered = CLAUSES
            .iter()
            .filter(|c| c.number.trim_end_matches('.').parse::<u8>().is_ok())
            .count();
        assert_eq!(numbered, 8);
        assert_eq!(CLAUSES[0].heading(), "1. Eligibility:");
        assert_eq!(CLAUSES[1].heading(), "a.");
    }
}
