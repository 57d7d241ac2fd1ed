//! Turn a model of either encoding back into the visit sequence

use super::model::Model;
use super::Tour;
use crate::board::{Board, Endpoints};
use crate::error::{EncodingError, Result};
use crate::sat::lfsr::{LfsrEncoding, STATE_BITS};
use crate::sat::{OrderEncoding, TourEncoder, TourEncoding};
use log::debug;

/// Decode the tour selected by `model`
pub fn decode(encoder: &TourEncoder, model: &Model) -> Result<Tour> {
    let tour = match encoder {
        TourEncoder::Lfsr(encoding) => decode_lfsr(encoding, model)?,
        TourEncoder::Order(encoding) => decode_order(encoding, model)?,
    };
    debug!("Decoded {} of {} squares", tour.len(), tour.board().square_count());
    Ok(tour)
}

/// Follow the selected successor of every square. Moves into the first
/// square are never constrained, so they are ignored.
fn decode_lfsr(encoding: &LfsrEncoding, model: &Model) -> Result<Tour> {
    let graph = encoding.graph();
    let vars = encoding.variables();
    let first = encoding.endpoints().first;
    walk(encoding.board(), encoding.endpoints(), |_, square| {
        graph
            .outgoing(square)
            .filter(|m| m.to != first && model.holds(vars.move_var(m)))
            .map(|m| m.to)
            .collect()
    })
}

/// Follow the selected undirected moves, never stepping straight back
fn decode_order(encoding: &OrderEncoding, model: &Model) -> Result<Tour> {
    let graph = encoding.graph();
    let vars = encoding.variables();
    walk(encoding.board(), encoding.endpoints(), |previous, square| {
        graph
            .incident(square)
            .into_iter()
            .filter(|m| model.holds(vars.move_var(m)))
            .map(|m| m.other(square))
            .filter(|&next| Some(next) != previous)
            .collect()
    })
}

fn walk<F>(board: &Board, endpoints: &Endpoints, mut continuations: F) -> Result<Tour>
where
    F: FnMut(Option<usize>, usize) -> Vec<usize>,
{
    let mut visited = vec![false; board.square_count()];
    let mut squares = vec![endpoints.first];
    visited[endpoints.first] = true;

    let mut previous = None;
    let mut current = endpoints.first;
    while current != endpoints.last {
        let next = match continuations(previous, current).as_slice() {
            [next] => *next,
            options => {
                return Err(EncodingError::InvalidModel(format!(
                    "square {} ({}) has {} selected continuations after step {}",
                    current + 1,
                    board.coordinate(current),
                    options.len(),
                    squares.len()
                )))
            }
        };
        if visited[next] {
            return Err(EncodingError::InvalidModel(format!(
                "square {} ({}) is visited twice",
                next + 1,
                board.coordinate(next)
            )));
        }
        visited[next] = true;
        squares.push(next);
        previous = Some(current);
        current = next;
    }

    Ok(Tour::new(*board, squares))
}

/// Register value the model assigns to `square`
pub fn register_state(encoding: &LfsrEncoding, model: &Model, square: usize) -> u8 {
    let vars = encoding.variables();
    (0..STATE_BITS).fold(0u8, |state, bit| {
        if model.holds(vars.state_bit(square, bit)) {
            state | (1 << bit)
        } else {
            state
        }
    })
}
