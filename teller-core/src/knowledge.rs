//! Built-in banking knowledge base.
//!
//! The corpus is compiled into the binary and indexed once at start-up. Its
//! order is significant: it fixes the document ids and therefore how exact
//! ties are broken.

pub const BANKING_DOCUMENTS: &[&str] = &[
    // Account Types
    "Checking accounts are transactional accounts used for daily banking needs like paying bills and making purchases",
    "Savings accounts earn interest on deposited money and are best for building emergency funds",
    "Money market accounts typically offer higher interest rates than regular savings accounts with some check-writing privileges",
    "Certificates of deposit (CDs) lock your money for a fixed term in exchange for higher interest rates",
    "Individual Retirement Accounts (IRAs) provide tax advantages for long-term retirement savings",
    // Credit Products
    "Credit cards offer revolving credit lines with different rewards programs like cash back or travel points",
    "Secured credit cards require a security deposit and help build credit history",
    "Personal loans provide fixed-amount borrowing with regular monthly payments",
    "Home equity lines of credit (HELOCs) let you borrow against your home's equity",
    "Mortgages are long-term loans used to finance home purchases with various term options",
    "Auto loans help finance vehicle purchases with the car serving as collateral",
    "Student loans help finance education expenses with federal and private options available",
    // Banking Services
    "Online banking provides 24/7 access to accounts through web browsers",
    "Mobile banking apps allow account management and mobile check deposits",
    "Bill pay services automate regular payments to service providers",
    "Direct deposit enables automatic deposit of paychecks into your account",
    "Wire transfers send money electronically between banks domestically or internationally",
    "ATM services provide cash withdrawals, deposits, and account information access",
    // Security Features
    "Two-factor authentication adds an extra layer of security to account access",
    "Fraud monitoring systems detect and alert unusual account activity",
    "Zero liability protection covers unauthorized transactions on credit cards",
    "Secure messaging allows safe communication with bank representatives",
    "Account alerts notify you about balance changes and suspicious activity",
    // Financial Planning
    "Budgeting tools help track income and expenses for better financial management",
    "Goal-based savings accounts help you save for specific purposes",
    "Investment accounts allow you to invest in stocks, bonds, and mutual funds",
    "Retirement planning services help prepare for long-term financial security",
    "Financial advisors provide personalized guidance on money management",
    // Fees and Charges
    "Monthly maintenance fees may apply to certain checking accounts",
    "Overdraft fees are charged when accounts are overdrawn",
    "ATM fees may apply when using out-of-network machines",
    "Wire transfer fees vary for domestic and international transfers",
    "Late payment fees apply to missed credit card or loan payments",
    // Digital Features
    "Mobile check deposit allows depositing checks through smartphone cameras",
    "Peer-to-peer payments enable sending money to friends and family",
    "Digital wallets support contactless payments using smartphones",
    "Online bill negotiation services help reduce monthly bills",
    "Automated savings tools round up purchases to save spare change",
    // Credit Building
    "Credit monitoring services track your credit score and report changes",
    "Secured credit products help establish credit history",
    "Credit building loans help improve credit scores over time",
    "Payment history reporting helps build positive credit records",
    "Credit limit increases are available with good payment history",
    // Business Banking
    "Business checking accounts support company transactions and payments",
    "Merchant services enable businesses to accept card payments",
    "Business loans provide capital for company growth and expenses",
    "Payroll services help manage employee compensation",
    "Business credit cards separate personal and company expenses",
    // Insurance Products
    "Life insurance policies protect family financial security",
    "Property insurance covers damage to homes and belongings",
    "Auto insurance provides vehicle accident coverage",
    "Identity theft insurance protects against fraud losses",
    "Travel insurance covers trip cancellations and emergencies",
    // Additional Services
    "Notary services authenticate important documents",
    "Safe deposit boxes store valuable items securely",
    "Foreign currency exchange for international travel",
    "Cashier's checks provide guaranteed payment for large transactions",
    "Money orders offer secure payment alternatives to cash",
    // Financial Education
    "Financial literacy resources teach money management basics",
    "Investment education explains market and portfolio concepts",
    "Credit score education helps understand credit reporting",
    "Debt management guidance helps reduce and eliminate debt",
    "Retirement planning workshops prepare for future needs",
    // Digital Security
    "Encryption protects online and mobile banking data",
    "Biometric authentication uses fingerprints or face recognition",
    "Regular security updates protect against new threats",
    "Secure password requirements protect account access",
    "Multi-device authentication verifies login attempts",
];

/// The built-in corpus as owned strings.
pub fn banking_corpus() -> Vec<String> {
    BANKING_DOCUMENTS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_corpus_is_non_empty_and_unique() {
        assert!(!BANKING_DOCUMENTS.is_empty());
        assert!(BANKING_DOCUMENTS.iter().all(|d| !d.trim().is_empty()));

        let unique: HashSet<&str> = BANKING_DOCUMENTS.iter().copied().collect();
        assert_eq!(unique.len(), BANKING_DOCUMENTS.len());
    }

    #[test]
    fn test_corpus_keeps_order() {
        let corpus = banking_corpus();
        assert!(corpus[0].starts_with("Checking accounts"));
        assert_eq!(corpus.len(), BANKING_DOCUMENTS.len());
    }
}
