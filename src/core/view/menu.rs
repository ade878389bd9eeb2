//=========================================================================
// Menu Overlay
//=========================================================================
//
// Options menu drawn above the foreground scene.
//
//   foreground has no options  → fading placeholder if a menu was just
//                                 showing, else nothing
//   MenuState::Disabled        → nothing
//   MenuState::Closed          → toggle button
//   MenuState::Open            → toggle button + one button per option
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::context::MenuState;
use crate::core::scene::{Msg, SceneState};
use crate::core::view::Node;

//=== MenuOption ==========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MenuOption<M> {
    pub label: &'static str,
    pub msg: M,
}

impl<M> MenuOption<M> {
    pub fn new(label: &'static str, msg: M) -> Self {
        Self { label, msg }
    }

    pub fn map<N, F>(self, f: F) -> MenuOption<N>
    where
        F: FnOnce(M) -> N,
    {
        MenuOption {
            label: self.label,
            msg: f(self.msg),
        }
    }
}

//=== Overlay =============================================================

/// `fading` is set when the foreground has no options but the previous
/// foreground left a menu on screen.
pub fn menu_overlay(scene: &SceneState, menu: MenuState, fading: bool) -> Node<Msg> {
    let options = scene.menu_options();
    if options.is_empty() {
        return if fading {
            Node::element("div").key("menu").attr("class", "menu-fade-out")
        } else {
            Node::Empty
        };
    }

    match menu {
        MenuState::Disabled => Node::Empty,

        MenuState::Closed => Node::element("div")
            .key("menu")
            .attr("class", "menu-closed")
            .child(Node::button("Menu", Msg::OpenMenu).key("menu-toggle")),

        MenuState::Open => {
            let buttons = options
                .into_iter()
                .map(|option| Node::button(option.label, option.msg).key(format!("menu-{}", option.label)));

            Node::element("div")
                .key("menu")
                .attr("class", "menu-open")
                .child(Node::button("Close", Msg::CloseMenu).key("menu-toggle"))
                .children(buttons)
        }
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::LevelId;
    use crate::core::scene::{Flags, Orchestrator, SceneMsg, Settings};
    use crate::core::scenes::HubMsg;

    fn orchestrator() -> Orchestrator {
        Orchestrator::init(Flags::default(), Settings::default()).0
    }

    fn hub_scene() -> SceneState {
        let mut orchestrator = orchestrator();
        orchestrator.update(Msg::GoToHub(LevelId::FIRST));
        orchestrator.scene().clone()
    }

    #[test]
    fn scene_without_options_fades_the_menu_out() {
        let title = orchestrator().scene().clone();
        let node = menu_overlay(&title, MenuState::Disabled, true);
        assert_eq!(node.get_attr("class"), Some("menu-fade-out"));
        assert!(node.click_messages().is_empty());
    }

    #[test]
    fn scene_without_options_and_no_prior_menu_renders_nothing() {
        let title = orchestrator().scene().clone();
        assert_eq!(menu_overlay(&title, MenuState::Disabled, false), Node::Empty);
    }

    #[test]
    fn disabled_menu_renders_nothing() {
        assert_eq!(menu_overlay(&hub_scene(), MenuState::Disabled, false), Node::Empty);
    }

    #[test]
    fn closed_menu_offers_only_the_toggle() {
        let node = menu_overlay(&hub_scene(), MenuState::Closed, false);
        assert_eq!(node.click_messages(), vec![&Msg::OpenMenu]);
    }

    #[test]
    fn open_menu_lists_scene_options() {
        let node = menu_overlay(&hub_scene(), MenuState::Open, false);
        assert_eq!(
            node.click_messages(),
            vec![
                &Msg::CloseMenu,
                &Msg::Scene(SceneMsg::Hub(HubMsg::ShowGarden)),
                &Msg::Scene(SceneMsg::Hub(HubMsg::ResetData)),
            ]
        );
    }
}
