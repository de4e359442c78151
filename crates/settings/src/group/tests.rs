use pretty_assertions::assert_eq;

use crate::condition::Condition;
use crate::container::SettingsContainer;
use crate::error::SettingsError;
use crate::observable::Observable;
use crate::property::AnyProperty;

fn names(properties: &[std::rc::Rc<dyn AnyProperty>]) -> Vec<String> {
	properties.iter().map(|p| p.name().to_string()).collect()
}

#[test]
fn test_unnamed_groups_get_synthetic_ids_per_parent() {
	let container = SettingsContainer::builder("general")
		.build(|root| {
			root.group("", |_| {});
			root.group("Editor", |g| {
				g.group("", |_| {});
			});
			root.group("", |_| {});
		})
		.unwrap();

	let subgroups = container.subgroups();
	let ids: Vec<_> = subgroups.iter().map(|g| g.identifier().to_string()).collect();
	assert_eq!(ids, ["group_0", "Editor", "group_1"]);
	assert_eq!(subgroups[0].title(), None);
	assert_eq!(subgroups[1].title(), Some("Editor"));
	assert_eq!(subgroups[1].subgroups()[0].path(), "general:Editor:group_0");
}

#[test]
fn test_paths_join_ancestors() {
	let flag = Observable::new(true);
	let container = SettingsContainer::builder("general")
		.build(|root| {
			root.group("Editor", |g| {
				g.group("Tabs", |t| {
					t.persistent_bool("wrap", "", &flag);
				});
			});
		})
		.unwrap();

	let wrap = container.find("wrap").unwrap();
	assert_eq!(wrap.group_path(), "general:Editor:Tabs");
	assert_eq!(wrap.id().to_string(), "general:Editor:Tabs/wrap");
	assert!(wrap.group().unwrap().parent().unwrap().parent().unwrap().ptr_eq(container.root()));
}

#[test]
fn test_all_properties_is_own_first_then_depth_first() {
	let cells: Vec<_> = (0..5).map(|_| Observable::new(false)).collect();
	let container = SettingsContainer::builder("general")
		.build(|root| {
			root.property("a", "", &cells[0]);
			root.group("One", |g| {
				g.property("b", "", &cells[1]);
				g.group("Nested", |n| {
					n.property("c", "", &cells[2]);
				});
			});
			root.group("Two", |g| {
				g.property("d", "", &cells[3]);
			});
			root.property("e", "", &cells[4]);
		})
		.unwrap();

	assert_eq!(names(&container.root().all_properties()), ["a", "e", "b", "c", "d"]);
	assert_eq!(names(&container.root().properties()), ["a", "e"]);
}

#[test]
fn test_emptiness() {
	let flag = Observable::new(false);
	let container = SettingsContainer::builder("general")
		.build(|root| {
			root.group("Empty", |_| {});
			root.group("Outer", |g| {
				g.group("Inner", |i| {
					i.property("flag", "", &flag);
				});
			});
		})
		.unwrap();

	let subgroups = container.subgroups();
	assert!(subgroups[0].is_totally_empty());
	assert!(subgroups[1].is_empty());
	assert!(!subgroups[1].is_totally_empty());
	assert!(container.root().is_empty());
}

#[test]
fn test_active_if_replaces_always_true() {
	let flag = Observable::new(false);
	let gate = Condition::settable(false);
	let container = SettingsContainer::builder("general")
		.build(|root| {
			root.group("Editor", |g| {
				g.active_if(gate.clone());
				g.property("flag", "", &flag);
			});
		})
		.unwrap();

	let condition = container.find("flag").unwrap().active_condition();
	assert!(condition.ptr_eq(&gate));
}

#[test]
fn test_active_if_ands_with_existing_condition() {
	let flag = Observable::new(false);
	let own = Condition::settable(true);
	let gate = Condition::settable(true);
	let container = SettingsContainer::builder("general")
		.build(|root| {
			root.group("Editor", |g| {
				g.active_if(gate.clone());
				let property = g.property("flag", "", &flag);
				property.set_active_condition(own.clone());
			});
		})
		.unwrap();
	container.init().unwrap();

	let condition = container.find("flag").unwrap().active_condition();
	assert!(!condition.ptr_eq(&own));
	assert!(condition.value());

	own.set(false).unwrap();
	assert!(!condition.value());
	own.set(true).unwrap();
	gate.set(false).unwrap();
	assert!(!condition.value());
}

#[test]
fn test_nested_scopes_and_together() {
	let flag = Observable::new(false);
	let outer = Condition::settable(true);
	let inner = Condition::settable(true);
	let container = SettingsContainer::builder("general")
		.build(|root| {
			root.active_if(outer.clone());
			root.group("Editor", |g| {
				g.active_if(inner.clone());
				g.property("flag", "", &flag);
			});
		})
		.unwrap();
	container.init().unwrap();

	let condition = container.find("flag").unwrap().active_condition();
	assert!(condition.value());
	outer.set(false).unwrap();
	assert!(!condition.value());
	outer.set(true).unwrap();
	inner.set(false).unwrap();
	assert!(!condition.value());
}

#[test]
fn test_hidden_is_outside_the_scope() {
	let visible = Observable::new(false);
	let secret = Observable::new(false);
	let gate = Condition::settable(false);
	let container = SettingsContainer::builder("general")
		.build(|root| {
			root.active_if(gate.clone());
			root.property("visible", "", &visible);
			root.hidden(|h| {
				h.property("secret", "", &secret);
			});
		})
		.unwrap();

	assert!(container.find("visible").unwrap().active_condition().ptr_eq(&gate));
	assert!(container.find("secret").unwrap().active_condition().is_always_true());
}

#[test]
fn test_find_searches_ancestors() {
	let top = Observable::new(true);
	let leaf = Observable::new(1_i64);
	let container = SettingsContainer::builder("general")
		.build(|root| {
			root.property("top", "", &top);
			root.group("Editor", |g| {
				g.property("leaf", "", &leaf);
			});
		})
		.unwrap();

	let editor = &container.subgroups()[0];
	assert_eq!(editor.find("top").unwrap().name(), "top");
	assert_eq!(container.root().find("leaf").unwrap().name(), "leaf");
	assert_eq!(
		editor.find("tpo").unwrap_err(),
		SettingsError::PropertyNotFound {
			name: "tpo".into(),
			suggestion: Some("top".into()),
		}
	);
	assert_eq!(
		editor.find("completely_unrelated").unwrap_err(),
		SettingsError::PropertyNotFound {
			name: "completely_unrelated".into(),
			suggestion: None,
		}
	);
}

#[test]
fn test_description_defaults_to_name() {
	let flag = Observable::new(false);
	let container = SettingsContainer::builder("general")
		.build(|root| {
			root.property("flag", "", &flag);
			root.property("other", "Other thing", &flag);
		})
		.unwrap();

	assert_eq!(container.find("flag").unwrap().description(), "flag");
	assert_eq!(container.find("other").unwrap().description(), "Other thing");
}
