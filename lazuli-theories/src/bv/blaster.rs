//! Bit-blasting of fixed-width bit-vector cubes into propositional formulas.
//!
//! Every bit-vector term gets one Boolean variable per bit, least-significant
//! first. Operators add defining constraints once per distinct term; atoms
//! are replaced by a single proxy equivalent to their bitwise meaning.

use lazuli_core::ast::{Sort, TermId, TermKind, TermManager};
use lazuli_core::error::{LazuliError, Result};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

/// Boolean variables of a bit-vector term, least-significant bit first.
pub type Bits = SmallVec<[TermId; 8]>;

/// Translates bit-vector terms and atoms into Boolean terms of the same
/// [`TermManager`].
#[derive(Debug)]
pub struct BitBlaster {
    width: u32,
    bits: FxHashMap<TermId, Bits>,
    atoms: FxHashMap<TermId, TermId>,
    constraints: Vec<TermId>,
}

impl BitBlaster {
    /// Blaster for terms of exactly `width` bits. Widths above 64 do not fit
    /// constants and are rejected.
    pub fn new(width: u32) -> Result<Self> {
        if width == 0 || width > 64 {
            return Err(LazuliError::unsupported(
                format!("bit width {width}"),
                "bit-blasting",
            ));
        }
        Ok(Self {
            width,
            bits: FxHashMap::default(),
            atoms: FxHashMap::default(),
            constraints: Vec::new(),
        })
    }

    /// Fixed width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Bits of an already blasted term.
    #[must_use]
    pub fn bits(&self, term: TermId) -> Option<&Bits> {
        self.bits.get(&term)
    }

    /// Blasted bit-vector terms.
    pub fn terms(&self) -> impl Iterator<Item = TermId> + '_ {
        self.bits.keys().copied()
    }

    /// Definitions accumulated so far.
    #[must_use]
    pub fn constraints(&self) -> &[TermId] {
        &self.constraints
    }

    /// Bits of `term`, adding its definition on first use.
    pub fn blast_term(&mut self, tm: &mut TermManager, term: TermId) -> Result<Bits> {
        if let Some(bits) = self.bits.get(&term) {
            return Ok(bits.clone());
        }
        let t = tm.term(term)?.clone();
        match t.sort {
            Sort::BitVec(w) if w == self.width => {}
            Sort::BitVec(w) => {
                return Err(LazuliError::WidthMismatch {
                    expected: self.width,
                    found: w,
                });
            }
            other => {
                return Err(LazuliError::sort_mismatch(
                    format!("(_ BitVec {})", self.width),
                    tm.sort_name(other),
                ));
            }
        }

        let bits = match t.kind {
            TermKind::Var(_) => {
                let name = tm.display(term).to_string();
                self.fresh_bits(tm, &name)
            }
            TermKind::BitVecConst { value, width } => {
                if width < 64 && value >> width != 0 {
                    return Err(LazuliError::ConstantOverflow { value, width });
                }
                let bits = self.fresh_bits(tm, "const");
                for (i, &bit) in bits.iter().enumerate() {
                    let unit = if (value >> i) & 1 == 1 {
                        bit
                    } else {
                        tm.mk_not(bit)
                    };
                    self.constraints.push(unit);
                }
                bits
            }
            TermKind::BvAnd(lhs, rhs) => {
                let x = self.blast_term(tm, lhs)?;
                let y = self.blast_term(tm, rhs)?;
                let bits = self.fresh_bits(tm, "and");
                for i in 0..bits.len() {
                    let both = tm.mk_and([x[i], y[i]]);
                    let def = tm.mk_iff(bits[i], both);
                    self.constraints.push(def);
                }
                bits
            }
            TermKind::BvOr(lhs, rhs) => {
                let x = self.blast_term(tm, lhs)?;
                let y = self.blast_term(tm, rhs)?;
                let bits = self.fresh_bits(tm, "or");
                for i in 0..bits.len() {
                    let either = tm.mk_or([x[i], y[i]]);
                    let def = tm.mk_iff(bits[i], either);
                    self.constraints.push(def);
                }
                bits
            }
            TermKind::BvAdd(lhs, rhs) => {
                let x = self.blast_term(tm, lhs)?;
                let y = self.blast_term(tm, rhs)?;
                let bits = self.fresh_bits(tm, "sum");
                self.encode_adder(tm, &bits, &x, &y);
                bits
            }
            kind => return Err(LazuliError::unsupported(kind.name(), "bit-blasting")),
        };
        trace!(term = %tm.display(term), "bit-blasted term");
        self.bits.insert(term, bits.clone());
        Ok(bits)
    }

    /// Ripple-carry adder: carry 0 is false and the final carry is dropped.
    fn encode_adder(&mut self, tm: &mut TermManager, sum: &[TermId], x: &[TermId], y: &[TermId]) {
        let mut carry = tm.mk_false();
        let last = sum.len() - 1;
        for i in 0..sum.len() {
            // s = x ^ y ^ c
            let xor_xy = tm.mk_xor(x[i], y[i]);
            let s = tm.mk_xor(xor_xy, carry);
            let def = tm.mk_iff(sum[i], s);
            self.constraints.push(def);
            if i == last {
                break;
            }
            // c' = (x & y) | (c & (x ^ y))
            let next = tm.mk_fresh_var("carry", Sort::Bool);
            let generate = tm.mk_and([x[i], y[i]]);
            let propagate = tm.mk_and([carry, xor_xy]);
            let out = tm.mk_or([generate, propagate]);
            let def = tm.mk_iff(next, out);
            self.constraints.push(def);
            carry = next;
        }
    }

    /// Proxy literal standing for a bit-vector atom: an equality or the
    /// negation of an atom. Boolean constants pass through.
    pub fn blast_atom(&mut self, tm: &mut TermManager, atom: TermId) -> Result<TermId> {
        if let Some(&proxy) = self.atoms.get(&atom) {
            return Ok(proxy);
        }
        let kind = tm.term(atom)?.kind.clone();
        let proxy = match kind {
            TermKind::True | TermKind::False => return Ok(atom),
            TermKind::Eq(lhs, rhs) => {
                if !tm.sort(lhs).is_some_and(|s| s.is_bitvec()) {
                    return Err(LazuliError::unsupported(
                        tm.display(atom).to_string(),
                        "bit-vector cube",
                    ));
                }
                let x = self.blast_term(tm, lhs)?;
                let y = self.blast_term(tm, rhs)?;
                let same: Vec<TermId> = x
                    .iter()
                    .zip(&y)
                    .map(|(&a, &b)| tm.mk_iff(a, b))
                    .collect();
                let all = tm.mk_and(same);
                let p = tm.mk_fresh_var("eq", Sort::Bool);
                let def = tm.mk_iff(p, all);
                self.constraints.push(def);
                p
            }
            TermKind::Not(inner) => {
                let p = self.blast_atom(tm, inner)?;
                let q = tm.mk_fresh_var("neq", Sort::Bool);
                let not_p = tm.mk_not(p);
                let def = tm.mk_iff(q, not_p);
                self.constraints.push(def);
                q
            }
            _ => return Err(LazuliError::NotALiteral(tm.display(atom).to_string())),
        };
        self.atoms.insert(atom, proxy);
        Ok(proxy)
    }

    /// Propositional formula equisatisfiable with the conjunction of `cube`.
    pub fn blast_cube(&mut self, tm: &mut TermManager, cube: &[TermId]) -> Result<TermId> {
        let mut proxies = Vec::with_capacity(cube.len());
        for &atom in cube {
            proxies.push(self.blast_atom(tm, atom)?);
        }
        let conjuncts: Vec<TermId> = self.constraints.iter().copied().chain(proxies).collect();
        Ok(tm.mk_and(conjuncts))
    }

    fn fresh_bits(&self, tm: &mut TermManager, prefix: &str) -> Bits {
        (0..self.width)
            .map(|i| tm.mk_fresh_var(&format!("{prefix}@{i}"), Sort::Bool))
            .collect()
    }
}
