//! Navigation menu. Visibility is presentation only; the gate still guards the
//! routes themselves.
use crate::services::auth::{GuardRule, Session, permits};

use super::guards;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

struct MenuEntry {
    href: &'static str,
    label: &'static str,
    rule: fn() -> GuardRule,
}

const fn entry(href: &'static str, label: &'static str, rule: fn() -> GuardRule) -> MenuEntry {
    MenuEntry { href, label, rule }
}

const MENU: &[MenuEntry] = &[
    entry("/tools", "Tools", guards::any_authenticated),
    entry("/loans", "Loans", guards::staff),
    entry("/clients", "Clients", guards::staff),
    entry("/tariffs", "Tariffs", guards::admin),
    entry("/kardex", "Kardex", guards::staff),
    entry("/reports", "Reports", guards::staff),
    entry("/profile", "Profile", guards::any_authenticated),
];

/// Menu links the session may follow, in display order.
pub fn menu_for(session: &Session) -> Vec<NavLink> {
    MENU.iter()
        .filter(|e| permits(&(e.rule)(), session))
        .map(|e| NavLink {
            href: e.href,
            label: e.label,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::roles::role_set;

    fn session(authenticated: bool, roles: &[&str]) -> Session {
        Session {
            initialized: true,
            authenticated,
            roles: role_set(roles.iter().copied()),
            ..Session::default()
        }
    }

    fn hrefs(links: &[NavLink]) -> Vec<&'static str> {
        links.iter().map(|l| l.href).collect()
    }

    #[test]
    fn anonymous_sees_nothing() {
        assert!(menu_for(&session(false, &[])).is_empty());
    }

    #[test]
    fn user_sees_staff_pages_but_not_tariffs() {
        let links = hrefs(&menu_for(&session(true, &["USER"])));
        assert_eq!(
            links,
            vec!["/tools", "/loans", "/clients", "/kardex", "/reports", "/profile"]
        );
    }

    #[test]
    fn admin_sees_everything() {
        let links = hrefs(&menu_for(&session(true, &["ADMIN"])));
        assert!(links.contains(&"/tariffs"));
        assert_eq!(links.len(), MENU.len());
    }

    #[test]
    fn authenticated_without_realm_roles_only_gets_open_pages() {
        let links = hrefs(&menu_for(&session(true, &[])));
        assert_eq!(links, vec!["/tools", "/profile"]);
    }
}
