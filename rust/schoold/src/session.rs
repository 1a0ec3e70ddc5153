//! Caller role lookup and the role-gated navigation built on it.

use crate::actions::RoleSource;
use crate::kinds::EntityKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "teacher" => Some(Self::Teacher),
            "student" => Some(Self::Student),
            "parent" => Some(Self::Parent),
            _ => None,
        }
    }
}

/// The caller's role, or `None` when there is none or the lookup failed.
pub fn current_role(source: &dyn RoleSource) -> Option<Role> {
    match source.current_role() {
        Ok(Some(raw)) => {
            let role = Role::parse(&raw);
            if role.is_none() {
                tracing::warn!(role = %raw, "ignoring unrecognized role");
            }
            role
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "role lookup failed; treating caller as anonymous");
            None
        }
    }
}

/// Whether `role` gets the create/update/delete affordances for `kind`.
pub fn can_manage(role: Option<Role>, kind: EntityKind) -> bool {
    match role {
        Some(Role::Admin) => true,
        Some(Role::Teacher) => matches!(
            kind,
            EntityKind::Lesson
                | EntityKind::Exam
                | EntityKind::Assignment
                | EntityKind::Result
                | EntityKind::Attendance
        ),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub href: &'static str,
    pub icon: &'static str,
    #[serde(skip)]
    visible: &'static [Role],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuSection {
    pub title: &'static str,
    pub items: &'static [MenuItem],
}

const ALL: &[Role] = &[Role::Admin, Role::Teacher, Role::Student, Role::Parent];
const STAFF: &[Role] = &[Role::Admin, Role::Teacher];
const ADMIN: &[Role] = &[Role::Admin];

const fn item(
    label: &'static str,
    href: &'static str,
    icon: &'static str,
    visible: &'static [Role],
) -> MenuItem {
    MenuItem {
        label,
        href,
        icon,
        visible,
    }
}

pub const MENU: [MenuSection; 2] = [
    MenuSection {
        title: "MENU",
        items: &[
            item("Home", "/", "/home.png", ALL),
            item("Teachers", "/list/teachers", "/teacher.png", STAFF),
            item("Students", "/list/students", "/student.png", STAFF),
            item("Parents", "/list/parents", "/parent.png", STAFF),
            item("Subjects", "/list/subjects", "/subject.png", ADMIN),
            item("Classes", "/list/classes", "/class.png", STAFF),
            item("Lessons", "/list/lessons", "/lesson.png", STAFF),
            item("Exams", "/list/exams", "/exam.png", ALL),
            item("Assignments", "/list/assignments", "/assignment.png", ALL),
            item("Results", "/list/results", "/result.png", ALL),
            item("Attendance", "/list/attendance", "/attendance.png", ALL),
            item("Events", "/list/events", "/calendar.png", ALL),
            item("Messages", "/list/messages", "/message.png", ALL),
            item("Announcements", "/list/announcements", "/announcement.png", ALL),
        ],
    },
    MenuSection {
        title: "OTHER",
        items: &[
            item("Profile", "/profile", "/profile.png", ALL),
            item("Settings", "/settings", "/setting.png", ALL),
            item("Logout", "/logout", "/logout.png", ALL),
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleSection {
    pub title: &'static str,
    pub items: Vec<MenuItem>,
}

/// Menu sections with only the items `role` may see; empty sections are dropped.
pub fn visible_menu(role: Option<Role>) -> Vec<VisibleSection> {
    let Some(role) = role else {
        return Vec::new();
    };
    MENU.iter()
        .map(|section| VisibleSection {
            title: section.title,
            items: section
                .items
                .iter()
                .filter(|i| i.visible.contains(&role))
                .copied()
                .collect(),
        })
        .filter(|s| !s.items.is_empty())
        .collect()
}
