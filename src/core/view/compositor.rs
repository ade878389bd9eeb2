//=========================================================================
// Compositor
//=========================================================================
//
// Stacks the layers of one frame, back to front:
//
//   background      fill of the foreground scene
//   backdrop        previous scene, if any          key: "<scene>"
//   scene           foreground scene                key: "<scene>"
//   menu            options overlay                 key: "menu"
//   loading screen  opaque cover while shown        key: "loading-screen"
//   animations      global keyframes                key: "animations"
//
// Scene layers are keyed by scene name, so a scene moving from backdrop
// to foreground is reconciled rather than replaced.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::animation::global_keyframes;
use super::menu::menu_overlay;
use super::Node;
use crate::core::context::Context;
use crate::core::scene::{Msg, Orchestrator, SceneState};

//=== Compose =============================================================

pub fn compose(orchestrator: &Orchestrator) -> Node<Msg> {
    let context = orchestrator.context();
    let scene = orchestrator.scene();

    let background = Node::element("div")
        .key("background")
        .attr("fill", scene.background());

    let backdrop = orchestrator
        .backdrop()
        .map_or(Node::Empty, |backdrop| scene_layer(backdrop, context, "backdrop"));

    Node::element("div")
        .key("app")
        .child(background)
        .child(backdrop)
        .child(scene_layer(scene, context, "scene"))
        .child(menu_overlay(scene, context.menu(), orchestrator.menu_fading()))
        .child(loading_screen(context))
        .child(
            Node::element("style")
                .key("animations")
                .child(Node::text(global_keyframes())),
        )
}

fn scene_layer(scene: &SceneState, context: &Context, layer: &'static str) -> Node<Msg> {
    Node::element("div")
        .key(scene.key().name())
        .attr("layer", layer)
        .child(scene.view(context))
}

fn loading_screen(context: &Context) -> Node<Msg> {
    let node = Node::element("div").key("loading-screen");
    match context.loading_screen() {
        Some(color) => node.attr("fill", color.hex()).attr("opacity", "1"),
        None => node.attr("opacity", "0"),
    }
}

//=== Tests ===============================================================
