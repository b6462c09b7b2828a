use crate::engine::error::MoveError;
use crate::engine::events::{GameEvent, QueueSink, SoundCue};
use crate::engine::intents::{Intent, ModeConfig};
use crate::engine::session::GameSession;
use crate::game::{
    Card, FreecellGame, GameMode, KlondikeGame, PileId, SpiderGame, SpiderSuitMode, Suit,
    TableauCard, ThirtyOneGame, TurnPhase, ACE, KING,
};

fn card(suit: Suit, rank: u8) -> Card {
    Card::new(suit, rank)
}

fn up(suit: Suit, rank: u8) -> TableauCard {
    TableauCard::face_up(card(suit, rank))
}

fn session(mode: GameMode) -> (GameSession<QueueSink>, QueueSink) {
    let sink = QueueSink::new();
    let session = GameSession::new(mode, Some(42), ModeConfig::default(), sink.clone());
    (session, sink)
}

/// Runs out the deal animation so tests start from an idle table.
fn settle(session: &mut GameSession<QueueSink>, sink: &QueueSink) {
    let _ = session.handle(Intent::CancelAnimation);
    session.tick();
    sink.drain();
}

fn run_until_idle(session: &mut GameSession<QueueSink>) {
    for _ in 0..10_000 {
        session.tick();
        if !session.is_animating() {
            return;
        }
    }
    panic!("scheduler never settled");
}

fn run_until_idle_or_celebrating(session: &mut GameSession<QueueSink>) {
    for _ in 0..10_000 {
        if session.scheduler().is_celebrating() || !session.is_animating() {
            return;
        }
        session.tick();
    }
    panic!("scheduler never settled");
}

#[test]
fn new_session_deals_with_a_flourish() {
    let (mut session, sink) = session(GameMode::Klondike);
    let events = sink.drain();
    assert!(events.contains(&GameEvent::SoundCue(SoundCue::GameStart)));
    assert!(session.is_animating());

    run_until_idle(&mut session);
    let events = sink.drain();
    assert!(events
        .iter()
        .any(|event| matches!(event, GameEvent::AnimationFrame(_))));
    assert!(events
        .iter()
        .any(|event| matches!(event, GameEvent::SoundCue(SoundCue::DealCard))));
}

#[test]
fn deal_announces_every_variant_pile() {
    let (_session, sink) = session(GameMode::ThirtyOne);
    let events = sink.drain();
    assert!(events.contains(&GameEvent::PileChanged { pile: PileId::Discard }));
    assert!(events.contains(&GameEvent::PileChanged { pile: PileId::Hand(0) }));

    let (_session, sink) = session(GameMode::Pyramid);
    let events = sink.drain();
    assert!(events.contains(&GameEvent::PileChanged {
        pile: PileId::Pyramid(27)
    }));

    let (_session, sink) = session(GameMode::Freecell);
    let events = sink.drain();
    assert!(events.contains(&GameEvent::PileChanged {
        pile: PileId::Freecell(3)
    }));
}

#[test]
fn draw_is_rejected_while_the_deal_is_flying() {
    let (mut session, sink) = session(GameMode::Klondike);
    sink.drain();

    assert_eq!(
        session.handle(Intent::DrawStock),
        Err(MoveError::AnimationBusy)
    );
    let events = sink.drain();
    assert!(events
        .iter()
        .any(|event| matches!(event, GameEvent::MoveRejected { .. })));
}

#[test]
fn animated_draw_lands_on_the_waste() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);
    let stock_before = session.state().klondike().stock_len();

    session.handle(Intent::DrawStock).unwrap();
    assert!(session.is_animating());
    assert_eq!(session.state().klondike().waste_len(), 0);

    run_until_idle(&mut session);
    assert_eq!(session.state().klondike().waste_len(), 1);
    assert_eq!(session.state().klondike().stock_len(), stock_before - 1);
    assert_eq!(session.move_count(), 1);

    let events = sink.drain();
    assert!(events.contains(&GameEvent::PileChanged { pile: PileId::Waste }));
    assert!(events.contains(&GameEvent::SoundCue(SoundCue::CardPlace)));
}

#[test]
fn cancelled_draw_still_delivers_every_card() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);
    session
        .handle(Intent::SetDrawMode(crate::game::DrawMode::Three))
        .unwrap();

    session.handle(Intent::DrawStock).unwrap();
    session.handle(Intent::CancelAnimation).unwrap();
    session.tick();

    assert!(!session.is_animating());
    assert_eq!(session.state().klondike().waste_len(), 3);
    assert_eq!(session.state().klondike().card_count(), 52);

    // A second cancel with nothing in flight is a no-op.
    sink.drain();
    session.handle(Intent::CancelAnimation).unwrap();
    session.tick();
    assert!(sink.is_empty());
    assert_eq!(session.state().klondike().waste_len(), 3);
}

#[test]
fn foundation_move_flies_then_settles() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);

    let game = session.debug_state_mut().klondike_mut();
    *game = KlondikeGame::debug_empty();
    game.debug_waste_mut().push(card(Suit::Hearts, ACE));
    session.debug_set_expected_cards(1);

    session
        .handle(Intent::MoveCards {
            src: PileId::Waste,
            start: 0,
            dst: PileId::Foundation(2),
        })
        .unwrap();
    assert!(session.is_animating());
    assert_eq!(session.state().klondike().foundations()[2].len(), 0);
    assert_eq!(session.state().klondike().waste_len(), 0);

    run_until_idle(&mut session);
    assert_eq!(session.state().klondike().foundations()[2].len(), 1);
    let events = sink.drain();
    assert!(events.contains(&GameEvent::SoundCue(SoundCue::FoundationMove)));
}

#[test]
fn foundation_destination_routes_by_suit() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);

    let game = session.debug_state_mut().klondike_mut();
    *game = KlondikeGame::debug_empty();
    game.debug_waste_mut().push(card(Suit::Clubs, ACE));
    session.debug_set_expected_cards(1);

    session
        .handle(Intent::MoveCards {
            src: PileId::Waste,
            start: 0,
            dst: PileId::Foundation(2),
        })
        .unwrap();
    run_until_idle(&mut session);

    // Clubs land on foundation 0 whatever slot the host asked for.
    assert_eq!(session.state().klondike().foundations()[0].len(), 1);
    assert_eq!(session.state().klondike().foundations()[2].len(), 0);
}

#[test]
fn rejected_foundation_move_leaves_the_board_alone() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);

    let game = session.debug_state_mut().klondike_mut();
    *game = KlondikeGame::debug_empty();
    game.debug_stock_mut().push(card(Suit::Clubs, 9));
    game.debug_tableau_mut()[0].push(up(Suit::Hearts, ACE));
    session.debug_set_expected_cards(2);

    session.handle(Intent::DrawStock).unwrap();
    assert!(session.is_animating());

    let result = session.handle(Intent::MoveCards {
        src: PileId::Tableau(0),
        start: 0,
        dst: PileId::Foundation(2),
    });
    assert_eq!(result, Err(MoveError::AnimationBusy));
    assert_eq!(session.state().klondike().foundations()[2].len(), 0);
    assert_eq!(session.state().klondike().tableau_len(0), Some(1));

    run_until_idle(&mut session);
    assert_eq!(session.state().klondike().waste_len(), 1);
    assert_eq!(session.state().klondike().card_count(), 2);
}

#[test]
fn foundation_reentry_force_completes_the_first_flight() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);

    let game = session.debug_state_mut().klondike_mut();
    *game = KlondikeGame::debug_empty();
    game.debug_waste_mut().push(card(Suit::Hearts, ACE));
    game.debug_tableau_mut()[0].push(up(Suit::Spades, ACE));
    session.debug_set_expected_cards(2);

    session
        .handle(Intent::MoveCards {
            src: PileId::Waste,
            start: 0,
            dst: PileId::Foundation(2),
        })
        .unwrap();
    session.tick();
    // Second launch while the first card is mid-air.
    session
        .handle(Intent::MoveCards {
            src: PileId::Tableau(0),
            start: 0,
            dst: PileId::Foundation(3),
        })
        .unwrap();

    // The hearts ace settled instantly.
    assert_eq!(session.state().klondike().foundations()[2].len(), 1);
    run_until_idle(&mut session);
    assert_eq!(session.state().klondike().foundations()[3].len(), 1);
}

#[test]
fn auto_finish_runs_to_the_win() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);

    let game = session.debug_state_mut().klondike_mut();
    *game = KlondikeGame::debug_empty();
    for (idx, &suit) in Suit::ALL.iter().enumerate() {
        game.debug_foundations_mut()[idx] = (1..=12).map(|rank| card(suit, rank)).collect();
        game.debug_tableau_mut()[idx].push(up(suit, KING));
    }
    session.debug_set_expected_cards(52);

    session.handle(Intent::AutoFinish).unwrap();
    run_until_idle_or_celebrating(&mut session);

    assert!(session
        .state()
        .klondike()
        .foundations()
        .iter()
        .all(|pile| pile.len() == 13));
    let events = sink.drain();
    assert!(events.contains(&GameEvent::GameWon));
    assert!(events.contains(&GameEvent::SoundCue(SoundCue::WinGame)));
    assert!(session.scheduler().is_celebrating());
}

#[test]
fn auto_finish_on_a_stuck_board_deactivates_quietly() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);

    let game = session.debug_state_mut().klondike_mut();
    *game = KlondikeGame::debug_empty();
    game.debug_tableau_mut()[0].push(up(Suit::Hearts, 5));
    session.debug_set_expected_cards(1);

    session.handle(Intent::AutoFinish).unwrap();
    run_until_idle(&mut session);
    let events = sink.drain();
    assert!(!events.contains(&GameEvent::GameWon));
}

#[test]
fn auto_finish_is_refused_where_it_means_nothing() {
    let (mut session, sink) = session(GameMode::Pyramid);
    settle(&mut session, &sink);
    assert!(matches!(
        session.handle(Intent::AutoFinish),
        Err(MoveError::IllegalMove { .. })
    ));
}

#[test]
fn seed_42_scenario_replays_identically() {
    let script = |session: &mut GameSession<QueueSink>, sink: &QueueSink| {
        settle(session, sink);
        for _ in 0..5 {
            let _ = session.handle(Intent::DrawStock);
            run_until_idle(session);
        }
        // Probe every tableau-to-tableau move once, in a fixed order.
        for src in 0..7 {
            for dst in 0..7 {
                for start in 0..7 {
                    let _ = session.handle(Intent::MoveCards {
                        src: PileId::Tableau(src),
                        start,
                        dst: PileId::Tableau(dst),
                    });
                    run_until_idle(session);
                }
            }
        }
    };

    let (mut a, sink_a) = session(GameMode::Klondike);
    let (mut b, sink_b) = session(GameMode::Klondike);
    script(&mut a, &sink_a);
    script(&mut b, &sink_b);

    assert_eq!(a.state().klondike(), b.state().klondike());
    assert_eq!(a.move_count(), b.move_count());
    assert_eq!(a.state().klondike().card_count(), 52);
}

#[test]
fn spider_run_completion_flies_out_and_retires() {
    let (mut session, sink) = session(GameMode::Spider);
    settle(&mut session, &sink);

    let mut tableau: [Vec<TableauCard>; 10] = std::array::from_fn(|_| Vec::new());
    // King down to Two in place; the Ace waits one column over.
    tableau[0] = (2..=13).rev().map(|rank| up(Suit::Spades, rank)).collect();
    tableau[1] = vec![up(Suit::Spades, ACE)];
    let game = SpiderGame::debug_new(SpiderSuitMode::One, Vec::new(), tableau);
    *session.debug_state_mut().spider_mut() = game;
    session.debug_set_expected_cards(13);

    session
        .handle(Intent::MoveCards {
            src: PileId::Tableau(1),
            start: 0,
            dst: PileId::Tableau(0),
        })
        .unwrap();
    assert!(session.is_animating());
    // Removal is deferred until the last card lands.
    assert_eq!(session.state().spider().tableau_len(0), Some(13));

    run_until_idle(&mut session);
    assert_eq!(session.state().spider().tableau_len(0), Some(0));
    assert_eq!(session.state().spider().completed_runs(), 1);
    assert_eq!(session.state().spider().card_count(), 13);
}

#[test]
fn spider_retires_back_to_back_runs() {
    let (mut session, sink) = session(GameMode::Spider);
    settle(&mut session, &sink);

    let mut tableau: [Vec<TableauCard>; 10] = std::array::from_fn(|_| Vec::new());
    tableau[0] = (2..=13).rev().map(|rank| up(Suit::Spades, rank)).collect();
    tableau[1] = (1..=13).rev().map(|rank| up(Suit::Spades, rank)).collect();
    tableau[2] = vec![up(Suit::Spades, ACE)];
    let game = SpiderGame::debug_new(SpiderSuitMode::One, Vec::new(), tableau);
    *session.debug_state_mut().spider_mut() = game;
    session.debug_set_expected_cards(26);

    // One move finishes the run in column 0 while column 1 already holds a
    // complete run; both must fly out, one after the other.
    session
        .handle(Intent::MoveCards {
            src: PileId::Tableau(2),
            start: 0,
            dst: PileId::Tableau(0),
        })
        .unwrap();
    run_until_idle(&mut session);

    assert_eq!(session.state().spider().completed_runs(), 2);
    assert_eq!(session.state().spider().tableau_len(0), Some(0));
    assert_eq!(session.state().spider().tableau_len(1), Some(0));
    assert_eq!(session.state().spider().card_count(), 26);
}

#[test]
fn freecell_without_room_rejects_a_two_card_run() {
    let (mut session, sink) = session(GameMode::Freecell);
    settle(&mut session, &sink);

    let game = session.debug_state_mut().freecell_mut();
    *game = FreecellGame::debug_empty();
    for cell in game.debug_freecells_mut().iter_mut() {
        *cell = Some(card(Suit::Clubs, 2));
    }
    for col in 0..8 {
        game.debug_tableau_mut()[col] = vec![up(Suit::Clubs, 12)];
    }
    game.debug_tableau_mut()[0] = vec![up(Suit::Hearts, 9), up(Suit::Spades, 8)];
    game.debug_tableau_mut()[1] = vec![up(Suit::Spades, 10)];
    session.debug_set_expected_cards(13);

    let result = session.handle(Intent::MoveCards {
        src: PileId::Tableau(0),
        start: 0,
        dst: PileId::Tableau(1),
    });
    assert!(matches!(result, Err(MoveError::IllegalMove { .. })));
    assert_eq!(session.state().freecell().tableau_len(0), Some(2));
}

#[test]
fn selection_survives_only_while_valid() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);

    let top = session.state().klondike().tableau_len(6).unwrap() - 1;
    session
        .handle(Intent::SelectCard {
            pile: PileId::Tableau(6),
            index: top,
        })
        .unwrap();
    assert_eq!(session.selection(), Some((PileId::Tableau(6), top)));

    let stale = session.handle(Intent::SelectCard {
        pile: PileId::Tableau(6),
        index: 40,
    });
    assert!(matches!(stale, Err(MoveError::InvalidIndex { .. })));
    assert_eq!(session.selection(), None);
}

#[test]
fn activate_selection_sends_an_ace_home() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);

    let game = session.debug_state_mut().klondike_mut();
    *game = KlondikeGame::debug_empty();
    game.debug_tableau_mut()[3].push(up(Suit::Diamonds, ACE));
    session.debug_set_expected_cards(1);

    session
        .handle(Intent::SelectCard {
            pile: PileId::Tableau(3),
            index: 0,
        })
        .unwrap();
    session.handle(Intent::ActivateSelection).unwrap();
    run_until_idle(&mut session);

    assert_eq!(session.state().klondike().foundations()[1].len(), 1);
    assert_eq!(session.selection(), None);
}

#[test]
fn switching_modes_parks_the_previous_deal() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);
    session.handle(Intent::DrawStock).unwrap();
    run_until_idle(&mut session);
    let klondike_before = session.state().klondike().clone();

    session
        .handle(Intent::SetGameMode(GameMode::Spider))
        .unwrap();
    session.tick();
    assert_eq!(session.mode(), GameMode::Spider);
    assert_eq!(session.state().spider().card_count(), 104);

    session
        .handle(Intent::SetGameMode(GameMode::Klondike))
        .unwrap();
    session.tick();
    assert_eq!(session.state().klondike(), &klondike_before);
}

#[test]
fn switching_modes_settles_in_flight_cards_first() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);

    let game = session.debug_state_mut().klondike_mut();
    *game = KlondikeGame::debug_empty();
    game.debug_waste_mut().push(card(Suit::Hearts, ACE));
    session.debug_set_expected_cards(1);

    session
        .handle(Intent::MoveCards {
            src: PileId::Waste,
            start: 0,
            dst: PileId::Foundation(2),
        })
        .unwrap();
    assert!(session.is_animating());

    session
        .handle(Intent::SetGameMode(GameMode::Spider))
        .unwrap();
    assert_eq!(session.mode(), GameMode::Spider);

    // The ace settled on the old variant's foundation, not into the void.
    assert_eq!(session.state().klondike().foundations()[2].len(), 1);
    assert_eq!(session.state().klondike().card_count(), 1);
}

#[test]
fn restart_replays_the_same_seed() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);
    session.handle(Intent::DrawStock).unwrap();
    run_until_idle(&mut session);

    session.handle(Intent::RestartGame).unwrap();
    settle(&mut session, &sink);
    assert_eq!(session.seed(), 42);
    assert_eq!(session.move_count(), 0);
    assert_eq!(
        session.state().klondike(),
        &KlondikeGame::new_with_seed(42)
    );
}

#[test]
fn thirty_one_knock_round_and_next_round() {
    let (mut session, sink) = session(GameMode::ThirtyOne);
    settle(&mut session, &sink);

    let game = session.debug_state_mut().thirty_one_mut();
    *game = ThirtyOneGame::debug_new(
        vec![
            vec![card(Suit::Hearts, 5), card(Suit::Hearts, 6), card(Suit::Spades, 2)],
            vec![card(Suit::Clubs, 9), card(Suit::Clubs, 8), card(Suit::Diamonds, 2)],
        ],
        vec![card(Suit::Spades, 7), card(Suit::Spades, 9)],
        vec![card(Suit::Diamonds, 4)],
    );
    session.debug_set_expected_cards(9);

    session.handle(Intent::Knock).unwrap();
    session
        .handle(Intent::MoveCards {
            src: PileId::Stock,
            start: 0,
            dst: PileId::Hand(1),
        })
        .unwrap();
    session
        .handle(Intent::MoveCards {
            src: PileId::Hand(1),
            start: 3,
            dst: PileId::Discard,
        })
        .unwrap();

    // The turn wrapped back to the knocker: hearts 11 loses to clubs 17.
    assert_eq!(session.state().thirty_one().phase(), TurnPhase::RoundEnd);
    assert_eq!(session.state().thirty_one().players()[0].tokens(), 2);
    assert_eq!(session.state().thirty_one().players()[1].tokens(), 3);

    session.handle(Intent::NextRound).unwrap();
    run_until_idle(&mut session);
    assert_eq!(session.state().thirty_one().phase(), TurnPhase::Draw);
    assert_eq!(session.state().thirty_one().card_count(), 52);
}

#[test]
fn lay_down_costs_everyone_else_a_token() {
    let (mut session, sink) = session(GameMode::ThirtyOne);
    settle(&mut session, &sink);

    let game = session.debug_state_mut().thirty_one_mut();
    *game = ThirtyOneGame::debug_new(
        vec![
            vec![card(Suit::Clubs, ACE), card(Suit::Diamonds, ACE), card(Suit::Hearts, ACE)],
            vec![card(Suit::Clubs, 9), card(Suit::Clubs, 8), card(Suit::Diamonds, 2)],
        ],
        vec![card(Suit::Spades, 7)],
        vec![card(Suit::Diamonds, 4)],
    );
    session.debug_set_expected_cards(8);

    session.handle(Intent::LayDown).unwrap();
    assert_eq!(session.state().thirty_one().phase(), TurnPhase::RoundEnd);
    assert_eq!(session.state().thirty_one().players()[0].tokens(), 3);
    assert_eq!(session.state().thirty_one().players()[1].tokens(), 2);
}

#[test]
fn turn_machine_intents_are_refused_elsewhere() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);
    assert!(matches!(
        session.handle(Intent::Knock),
        Err(MoveError::IllegalMove { .. })
    ));
    assert!(matches!(
        session.handle(Intent::NextRound),
        Err(MoveError::IllegalMove { .. })
    ));
}

#[test]
fn win_starts_the_celebration_and_only_cancel_ends_it() {
    let (mut session, sink) = session(GameMode::Klondike);
    settle(&mut session, &sink);

    let game = session.debug_state_mut().klondike_mut();
    *game = KlondikeGame::debug_empty();
    for (idx, &suit) in Suit::ALL.iter().enumerate() {
        game.debug_foundations_mut()[idx] = (1..=12).map(|rank| card(suit, rank)).collect();
    }
    game.debug_waste_mut().push(card(Suit::Clubs, KING));
    game.debug_waste_mut().push(card(Suit::Diamonds, KING));
    game.debug_waste_mut().push(card(Suit::Hearts, KING));
    game.debug_waste_mut().push(card(Suit::Spades, KING));
    session.debug_set_expected_cards(52);

    for _ in 0..4 {
        session
            .handle(Intent::MoveCards {
                src: PileId::Waste,
                start: 0,
                dst: PileId::Foundation(0),
            })
            .unwrap();
        run_until_idle_or_celebrating(&mut session);
    }

    assert!(session.scheduler().is_celebrating());
    let events = sink.drain();
    assert!(events.contains(&GameEvent::GameWon));

    // The celebration cycles; hundreds of ticks later it is still going.
    for _ in 0..600 {
        session.tick();
    }
    assert!(session.scheduler().is_celebrating());

    session.handle(Intent::CancelAnimation).unwrap();
    session.tick();
    assert!(!session.is_animating());
}
