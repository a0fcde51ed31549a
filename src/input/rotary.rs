/*
 *  input/rotary.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Quadrature decoder for the rotary encoder
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use super::Direction;

/// Steps per (prev AB, new AB) transition, index is `prev << 2 | new`.
/// Illegal double-bit jumps count as 0, which is what rejects contact bounce.
const TRANSITIONS: [i8; 16] = [
    0, -1, 1, 0,
    1, 0, 0, -1,
    -1, 0, 0, 1,
    0, 1, -1, 0,
];

/// Counts quadrature edges and reports one direction per detent.
///
/// A changing before B (clockwise on the usual wiring) counts up. Most knobs
/// produce 4 edges per detent, hence the default `steps_per_click`.
#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    last: u8,
    count: i32,
    steps_per_click: i32,
}

impl QuadratureDecoder {
    pub fn new(a: bool, b: bool, steps_per_click: u8) -> Self {
        Self {
            last: Self::bits(a, b),
            count: 0,
            steps_per_click: i32::from(steps_per_click.max(1)),
        }
    }

    #[inline]
    fn bits(a: bool, b: bool) -> u8 {
        (u8::from(a) << 1) | u8::from(b)
    }

    /// Feed the current pin levels, returns a direction once a full detent has passed
    pub fn update(&mut self, a: bool, b: bool) -> Option<Direction> {
        let now = Self::bits(a, b);
        if now == self.last {
            return None;
        }
        self.count += i32::from(TRANSITIONS[usize::from((self.last << 2) | now)]);
        self.last = now;

        if self.count >= self.steps_per_click {
            self.count -= self.steps_per_click;
            Some(Direction::Increase)
        } else if self.count <= -self.steps_per_click {
            self.count += self.steps_per_click;
            Some(Direction::Decrease)
        } else {
            None
        }
    }
}
