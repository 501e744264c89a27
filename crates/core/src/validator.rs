//! Pattern-based grading of submitted challenge code.
//!
//! Grading never executes the submission. Each challenge id maps to a
//! [`Rule`]: a [`Predicate`] over the raw source text plus the messages shown
//! for a pass or a fail. New challenges register a rule; nothing else changes.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::model::ChallengeId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Failure raised by a predicate while inspecting code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PredicateError(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("no validation rule registered for challenge {0}")]
    UnknownChallenge(ChallengeId),

    #[error("rule for challenge {id} failed: {source}")]
    Predicate {
        id: ChallengeId,
        #[source]
        source: PredicateError,
    },
}

//
// ─── PREDICATES ────────────────────────────────────────────────────────────────
//

/// Pure test over submitted source text.
pub trait Predicate: Send + Sync {
    /// Returns whether `code` satisfies the rule.
    ///
    /// # Errors
    ///
    /// Returns `PredicateError` if the predicate cannot reach a decision.
    fn matches(&self, code: &str) -> Result<bool, PredicateError>;
}

impl<F> Predicate for F
where
    F: Fn(&str) -> Result<bool, PredicateError> + Send + Sync,
{
    fn matches(&self, code: &str) -> Result<bool, PredicateError> {
        self(code)
    }
}

/// Passes when the regex matches anywhere in the code.
#[derive(Debug, Clone)]
pub struct RegexPredicate {
    regex: Regex,
}

impl RegexPredicate {
    /// Compile `pattern` into a predicate.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    #[must_use]
    pub fn from_regex(regex: Regex) -> Self {
        Self { regex }
    }
}

impl Predicate for RegexPredicate {
    fn matches(&self, code: &str) -> Result<bool, PredicateError> {
        Ok(self.regex.is_match(code))
    }
}

/// Passes when every literal fragment occurs somewhere in the code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainsAll {
    fragments: Vec<String>,
}

impl ContainsAll {
    #[must_use]
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }
}

impl Predicate for ContainsAll {
    fn matches(&self, code: &str) -> Result<bool, PredicateError> {
        Ok(self
            .fragments
            .iter()
            .all(|fragment| code.contains(fragment.as_str())))
    }
}

//
// ─── RULES ─────────────────────────────────────────────────────────────────────
//

/// A predicate together with its user-facing messages.
#[derive(Clone)]
pub struct Rule {
    predicate: Arc<dyn Predicate>,
    pass_message: String,
    fail_message: String,
}

impl Rule {
    #[must_use]
    pub fn new(
        predicate: impl Predicate + 'static,
        pass_message: impl Into<String>,
        fail_message: impl Into<String>,
    ) -> Self {
        Self {
            predicate: Arc::new(predicate),
            pass_message: pass_message.into(),
            fail_message: fail_message.into(),
        }
    }

    #[must_use]
    pub fn pass_message(&self) -> &str {
        &self.pass_message
    }

    #[must_use]
    pub fn fail_message(&self) -> &str {
        &self.fail_message
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("pass_message", &self.pass_message)
            .field("fail_message", &self.fail_message)
            .finish_non_exhaustive()
    }
}

/// Outcome of checking one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub pass: bool,
    pub message: String,
}

//
// ─── VALIDATOR ─────────────────────────────────────────────────────────────────
//

/// Registry of grading rules keyed by challenge id.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: HashMap<ChallengeId, Rule>,
}

impl Validator {
    /// A validator with no rules; every check reports an unknown challenge.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A validator holding the rules for the five built-in challenges.
    #[must_use]
    pub fn with_builtin_rules() -> Self {
        let mut validator = Self::empty();
        for (id, rule) in builtin_rules() {
            validator.register(id, rule);
        }
        validator
    }

    /// Add or replace the rule for `id`. Other rules are untouched.
    pub fn register(&mut self, id: impl Into<ChallengeId>, rule: Rule) -> &mut Self {
        self.rules.insert(id.into(), rule);
        self
    }

    #[must_use]
    pub fn has_rule(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    /// Grade `code` against the rule registered for `id`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownChallenge` when no rule is registered,
    /// or `ValidationError::Predicate` when the predicate itself fails.
    pub fn check(&self, id: &str, code: &str) -> Result<Verdict, ValidationError> {
        let rule = self
            .rules
            .get(id)
            .ok_or_else(|| ValidationError::UnknownChallenge(ChallengeId::new(id)))?;

        let pass = rule
            .predicate
            .matches(code)
            .map_err(|source| ValidationError::Predicate {
                id: ChallengeId::new(id),
                source,
            })?;

        let message = if pass {
            rule.pass_message.clone()
        } else {
            rule.fail_message.clone()
        };
        Ok(Verdict { pass, message })
    }
}

//
// ─── BUILT-IN RULES ────────────────────────────────────────────────────────────
//

static CONNECT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"new xrpl\.Client\(['"](wss://s\.altnet\.rippletest\.net(:51233)?)['"]\)"#)
        .expect("connect pattern is a valid regex")
});

static FUND_WALLET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"const\s+fundedWallet\s+=\s+await\s+client\.fundWallet\(\s*\)")
        .expect("wallet pattern is a valid regex")
});

const PAYMENT_FIELDS: [&str; 4] = [
    "TransactionType: 'Payment'",
    "Account: senderWallet.address",
    "Destination: destinationAddress",
    "Amount: drops",
];

const TX_LOOKUP_FIELDS: [&str; 2] = ["command: 'tx'", "transaction: transactionHash"];

const ESCROW_FIELDS: [&str; 5] = [
    "TransactionType: 'EscrowCreate'",
    "Account: senderWallet.address",
    "Destination: destinationAddress",
    "Amount: drops",
    "FinishAfter: xrpl.isoTimeToRippleTime",
];

fn builtin_rules() -> Vec<(&'static str, Rule)> {
    vec![
        (
            "connect",
            Rule::new(
                RegexPredicate::from_regex(CONNECT_PATTERN.clone()),
                "connected to TestNet",
                "wrong TestNet URL",
            ),
        ),
        (
            "wallet",
            Rule::new(
                RegexPredicate::from_regex(FUND_WALLET_PATTERN.clone()),
                "wallet funded",
                "must call fundWallet()",
            ),
        ),
        (
            "send-xrp",
            Rule::new(
                ContainsAll::new(PAYMENT_FIELDS),
                "payment transaction valid",
                "missing one of 4 required fields",
            ),
        ),
        (
            "check-transaction",
            Rule::new(
                ContainsAll::new(TX_LOOKUP_FIELDS),
                "tx lookup request valid",
                "missing command/transaction fields",
            ),
        ),
        (
            "escrow",
            Rule::new(
                ContainsAll::new(ESCROW_FIELDS),
                "escrow transaction valid",
                "missing one of 5 required fields",
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(id: &str, code: &str) -> Verdict {
        Validator::with_builtin_rules().check(id, code).unwrap()
    }

    #[test]
    fn connect_accepts_url_with_port() {
        let verdict = check(
            "connect",
            "const client = new xrpl.Client('wss://s.altnet.rippletest.net:51233');",
        );
        assert!(verdict.pass);
        assert_eq!(verdict.message, "connected to TestNet");
    }

    #[test]
    fn connect_accepts_url_without_port_and_double_quotes() {
        let verdict = check(
            "connect",
            r#"const client = new xrpl.Client("wss://s.altnet.rippletest.net");"#,
        );
        assert!(verdict.pass);
    }

    #[test]
    fn connect_rejects_other_urls() {
        for url in [
            "YOUR_TESTNET_URL",
            "wss://xrplcluster.com",
            "wss://s.altnet.rippletest.net:443",
        ] {
            let verdict = check("connect", &format!("new xrpl.Client('{url}')"));
            assert!(!verdict.pass, "{url} should fail");
            assert_eq!(verdict.message, "wrong TestNet URL");
        }
    }

    #[test]
    fn wallet_requires_fund_wallet_call_without_arguments() {
        assert!(check("wallet", "const fundedWallet = await client.fundWallet();").pass);
        assert!(check("wallet", "const  fundedWallet =  await client.fundWallet( )").pass);

        let verdict = check("wallet", "const fundedWallet = null;");
        assert!(!verdict.pass);
        assert_eq!(verdict.message, "must call fundWallet()");
        assert!(!check("wallet", "const fundedWallet = await client.fundWallet(opts)").pass);
    }

    #[test]
    fn send_xrp_needs_all_four_fields() {
        let all = PAYMENT_FIELDS.join(",\n");
        let verdict = check("send-xrp", &all);
        assert!(verdict.pass);
        assert_eq!(verdict.message, "payment transaction valid");

        let three = PAYMENT_FIELDS[..3].join(",\n");
        let verdict = check("send-xrp", &three);
        assert!(!verdict.pass);
        assert_eq!(verdict.message, "missing one of 4 required fields");
    }

    #[test]
    fn check_transaction_needs_command_and_hash() {
        assert!(check("check-transaction", "{ command: 'tx', transaction: transactionHash }").pass);
        let verdict = check("check-transaction", "{ command: 'tx' }");
        assert_eq!(verdict.message, "missing command/transaction fields");
    }

    #[test]
    fn escrow_needs_all_five_fields() {
        let all = ESCROW_FIELDS.join(",\n");
        assert!(check("escrow", &all).pass);

        let missing_finish = ESCROW_FIELDS[..4].join(",\n");
        let verdict = check("escrow", &missing_finish);
        assert!(!verdict.pass);
        assert_eq!(verdict.message, "missing one of 5 required fields");
    }

    #[test]
    fn unknown_challenge_is_an_error() {
        let err = Validator::with_builtin_rules()
            .check("multisig", "anything")
            .unwrap_err();
        assert_eq!(err, ValidationError::UnknownChallenge(ChallengeId::new("multisig")));
    }

    #[test]
    fn registering_a_rule_leaves_others_alone() {
        let mut validator = Validator::with_builtin_rules();
        validator.register(
            "trustline",
            Rule::new(ContainsAll::new(["TrustSet"]), "ok", "no"),
        );

        assert!(validator.has_rule("trustline"));
        assert!(validator.check("trustline", "TrustSet").unwrap().pass);
        assert!(validator.check("escrow", &ESCROW_FIELDS.join(" ")).unwrap().pass);
    }

    #[test]
    fn predicate_failure_is_reported_with_challenge_id() {
        let mut validator = Validator::empty();
        validator.register(
            "broken",
            Rule::new(
                |_: &str| -> Result<bool, PredicateError> {
                    Err(PredicateError("parser unavailable".into()))
                },
                "ok",
                "no",
            ),
        );

        let err = validator.check("broken", "code").unwrap_err();
        assert!(matches!(err, ValidationError::Predicate { ref id, .. } if id.as_str() == "broken"));
    }
}
