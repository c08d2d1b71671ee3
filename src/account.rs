// Static dashboard data
//
// Every financial figure in the app is a hard-coded literal by design:
// there is no backend, no ledger, no model. This module is the one place
// holding the demo book the Overview and Profile screens render.

/// A month on the cash-flow forecast chart
#[derive(Debug, Clone, Copy)]
pub struct CashFlowPoint {
    pub month: &'static str,
    pub amount: f64,
}

/// Severity drives the accent color of an insight card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightSeverity {
    Positive,
    Opportunity,
    Risk,
}

/// A canned "AI insight" card on the overview screen
#[derive(Debug, Clone, Copy)]
pub struct Insight {
    pub title: &'static str,
    pub body: &'static str,
    pub action: &'static str,
    pub severity: InsightSeverity,
}

/// Everything the overview screen shows
#[derive(Debug, Clone)]
pub struct OverviewBook {
    pub total_balance: f64,
    pub trend_pct: f64,
    pub trend_note: &'static str,
    pub cash_flow: Vec<CashFlowPoint>,
    pub cash_flow_alert: &'static str,
    pub insights: Vec<Insight>,
}

impl OverviewBook {
    pub fn demo() -> Self {
        Self {
            total_balance: 84_532.00,
            trend_pct: 2.3,
            trend_note: "Positive cash flow trend detected",
            cash_flow: vec![
                CashFlowPoint { month: "Jan", amount: 20_000.0 },
                CashFlowPoint { month: "Feb", amount: 45_000.0 },
                CashFlowPoint { month: "Mar", amount: 28_000.0 },
                CashFlowPoint { month: "Apr", amount: 80_000.0 },
                CashFlowPoint { month: "May", amount: 99_000.0 },
                CashFlowPoint { month: "Jun", amount: 43_000.0 },
            ],
            cash_flow_alert:
                "Potential cash flow dip predicted in August. Consider adjusting expenses.",
            insights: vec![
                Insight {
                    title: "Cost Saving Opportunity",
                    body: "Switch to annual software subscriptions to save $2,400/year. \
                           5 subscriptions identified.",
                    action: "View Details",
                    severity: InsightSeverity::Positive,
                },
                Insight {
                    title: "Investment Opportunity",
                    body: "Market conditions favorable for expanding investment portfolio. \
                           Expected ROI: 12-15%",
                    action: "Analyze Options",
                    severity: InsightSeverity::Opportunity,
                },
                Insight {
                    title: "Risk Alert",
                    body: "Vendor payment clustering detected. Recommend spreading payments \
                           to optimize cash flow.",
                    action: "Optimize Schedule",
                    severity: InsightSeverity::Risk,
                },
            ],
        }
    }

    /// Chart bounds with a little headroom above the highest month
    pub fn cash_flow_bounds(&self) -> (f64, f64) {
        let max = self
            .cash_flow
            .iter()
            .map(|p| p.amount)
            .fold(0.0_f64, f64::max);
        (0.0, max * 1.1)
    }
}

/// What pressing a profile menu item does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Feature is a placeholder - pops a "coming soon" toast
    ComingSoon,
    /// Cycle the color theme
    CycleTheme,
    /// Sign out and return to the login gate
    SignOut,
}

/// One row in a profile menu section
#[derive(Debug, Clone, Copy)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: MenuAction,
}

/// A titled group of menu rows
#[derive(Debug, Clone)]
pub struct MenuSection {
    pub title: &'static str,
    pub items: Vec<MenuItem>,
}

/// The profile screen's menu, mirroring the original section layout
pub fn profile_menu() -> Vec<MenuSection> {
    vec![
        MenuSection {
            title: "Account Settings",
            items: vec![
                MenuItem { label: "Edit Profile", action: MenuAction::ComingSoon },
                MenuItem { label: "Notifications", action: MenuAction::ComingSoon },
                MenuItem { label: "Linked Accounts", action: MenuAction::ComingSoon },
            ],
        },
        MenuSection {
            title: "Preferences",
            items: vec![
                MenuItem { label: "Currency", action: MenuAction::ComingSoon },
                MenuItem { label: "Theme", action: MenuAction::CycleTheme },
                MenuItem { label: "Language", action: MenuAction::ComingSoon },
            ],
        },
        MenuSection {
            title: "Security",
            items: vec![
                MenuItem { label: "Change Password", action: MenuAction::ComingSoon },
                MenuItem { label: "Two-Factor Auth", action: MenuAction::ComingSoon },
                MenuItem { label: "Sign Out", action: MenuAction::SignOut },
            ],
        },
    ]
}

/// Flattened (section, item) list for cursor navigation
pub fn menu_rows(sections: &[MenuSection]) -> Vec<MenuItem> {
    sections.iter().flat_map(|s| s.items.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_book_matches_product_figures() {
        let book = OverviewBook::demo();
        assert_eq!(book.total_balance, 84_532.00);
        assert_eq!(book.cash_flow.len(), 6);
        assert_eq!(book.cash_flow[4].amount, 99_000.0);
        assert_eq!(book.insights.len(), 3);
    }

    #[test]
    fn chart_bounds_leave_headroom() {
        let book = OverviewBook::demo();
        let (lo, hi) = book.cash_flow_bounds();
        assert_eq!(lo, 0.0);
        assert!(hi > 99_000.0);
    }

    #[test]
    fn menu_has_sign_out_and_theme() {
        let rows = menu_rows(&profile_menu());
        assert!(rows.iter().any(|r| r.action == MenuAction::SignOut));
        assert!(rows.iter().any(|r| r.action == MenuAction::CycleTheme));
    }
}
