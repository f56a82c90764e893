//! 顧客名の照合
//!
//! 正規化済みトークン同士の一致数でスコアを付け、名簿から最良の候補を選ぶ。
//!
//! - 完全一致: `exact_weight`（既定 1.0）
//! - 部分一致（両方が `substring_min_len` 文字超で、一方が他方を含む）: `substring_weight`（既定 0.8）
//! - スコア = 合計 / max(対象トークン数, 候補トークン数, 1)
//! - スコアが `threshold` を超えた場合のみ採用（同点は名簿の先頭側）
//!
//! 計算量は 名簿件数 × 対象トークン数 × 候補トークン数。数千件規模までを想定しており、
//! それ以上ならトークンの転置索引が必要になる。

use crate::config::MatchConfig;
use crate::normalize::{normalize_with, tokenize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 照合結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 名簿上の表記（正規化前）
    pub name: String,
    /// 名簿内の位置
    pub index: usize,
    /// 信頼度（0.0〜1.0）
    pub score: f64,
}

/// トークン一致数の内訳
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenOverlap {
    pub exact: usize,
    pub partial: usize,
}

impl TokenOverlap {
    /// 全トークン対を数える
    pub fn count(
        target: &BTreeSet<String>,
        candidate: &BTreeSet<String>,
        config: &MatchConfig,
    ) -> Self {
        let mut overlap = Self::default();

        for t_tok in target {
            for c_tok in candidate {
                if t_tok == c_tok {
                    overlap.exact += 1;
                } else if is_partial_match(t_tok, c_tok, config.substring_min_len) {
                    overlap.partial += 1;
                }
            }
        }

        overlap
    }

    pub fn matches(&self) -> usize {
        self.exact + self.partial
    }

    /// 重み付き合計（正規化前）
    pub fn weighted(&self, config: &MatchConfig) -> f64 {
        self.exact as f64 * config.exact_weight + self.partial as f64 * config.substring_weight
    }
}

fn is_partial_match(a: &str, b: &str, min_len: usize) -> bool {
    a.chars().count() > min_len
        && b.chars().count() > min_len
        && (a.contains(b) || b.contains(a))
}

/// トークン集合同士のスコア
///
/// 同じトークンが複数の候補トークンに部分一致すると 1.0 を超えることがある。
/// 順位付けにはこの値をそのまま使う。
pub fn score_tokens(
    target: &BTreeSet<String>,
    candidate: &BTreeSet<String>,
    config: &MatchConfig,
) -> f64 {
    let overlap = TokenOverlap::count(target, candidate, config);
    let denominator = target.len().max(candidate.len()).max(1);
    overlap.weighted(config) / denominator as f64
}

/// 正規化・トークン化済みの名簿候補
#[derive(Debug, Clone)]
struct Candidate {
    name: String,
    tokens: BTreeSet<String>,
}

/// 名簿照合器
#[derive(Debug, Clone, Default)]
pub struct EntityMatcher {
    config: MatchConfig,
}

impl EntityMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// 名前を正規化してトークン集合にする
    pub fn tokens(&self, name: &str) -> BTreeSet<String> {
        tokenize(&normalize_with(name, &self.config), &self.config)
    }

    /// 最良候補の名簿表記を返す（閾値以下なら None）
    pub fn find_best_match<'a, S: AsRef<str>>(
        &self,
        target: &str,
        candidates: &'a [S],
    ) -> Option<&'a str> {
        self.best_match(target, candidates)
            .map(|m| candidates[m.index].as_ref())
    }

    /// 最良候補をスコア付きで返す
    pub fn best_match<S: AsRef<str>>(&self, target: &str, candidates: &[S]) -> Option<MatchResult> {
        let target_tokens = self.tokens(target);
        if target_tokens.is_empty() {
            return None;
        }

        let scored = candidates.iter().enumerate().map(|(index, candidate)| {
            let tokens = self.tokens(candidate.as_ref());
            (index, candidate.as_ref(), score_tokens(&target_tokens, &tokens, &self.config))
        });
        select_best(scored, self.config.threshold)
    }

    /// スコアが 0 を超える候補を降順で返す（同点は名簿順）
    pub fn rank<S: AsRef<str>>(
        &self,
        target: &str,
        candidates: &[S],
        limit: usize,
    ) -> Vec<MatchResult> {
        let target_tokens = self.tokens(target);
        if target_tokens.is_empty() {
            return Vec::new();
        }

        let scored = candidates.iter().enumerate().map(|(index, candidate)| {
            let tokens = self.tokens(candidate.as_ref());
            (index, candidate.as_ref(), score_tokens(&target_tokens, &tokens, &self.config))
        });
        rank_scored(scored, limit)
    }

    /// 名簿を一度だけ正規化しておく
    pub fn prepare<S: AsRef<str>>(&self, candidates: &[S]) -> PreparedRoster {
        let candidates = candidates
            .iter()
            .map(|c| Candidate {
                name: c.as_ref().to_string(),
                tokens: self.tokens(c.as_ref()),
            })
            .collect();

        PreparedRoster {
            matcher: self.clone(),
            candidates,
        }
    }
}

/// 正規化済み名簿
///
/// 読み取り専用なので複数スレッドから同時に照合してよい。
#[derive(Debug, Clone)]
pub struct PreparedRoster {
    matcher: EntityMatcher,
    candidates: Vec<Candidate>,
}

impl PreparedRoster {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn config(&self) -> &MatchConfig {
        self.matcher.config()
    }

    /// 最良候補をスコア付きで返す
    pub fn best_match(&self, target: &str) -> Option<MatchResult> {
        let target_tokens = self.matcher.tokens(target);
        if target_tokens.is_empty() {
            return None;
        }

        let config = self.matcher.config();
        let scored = self.candidates.iter().enumerate().map(|(index, c)| {
            (index, c.name.as_str(), score_tokens(&target_tokens, &c.tokens, config))
        });
        select_best(scored, config.threshold)
    }

    /// 最良候補の名簿表記
    pub fn find_best_match(&self, target: &str) -> Option<&str> {
        self.best_match(target)
            .map(|m| self.candidates[m.index].name.as_str())
    }

    pub fn rank(&self, target: &str, limit: usize) -> Vec<MatchResult> {
        let target_tokens = self.matcher.tokens(target);
        if target_tokens.is_empty() {
            return Vec::new();
        }

        let config = self.matcher.config();
        let scored = self.candidates.iter().enumerate().map(|(index, c)| {
            (index, c.name.as_str(), score_tokens(&target_tokens, &c.tokens, config))
        });
        rank_scored(scored, limit)
    }
}

/// 既定設定で照合する
pub fn find_best_match<S: AsRef<str>>(target: &str, candidates: &[S]) -> Option<String> {
    EntityMatcher::default()
        .find_best_match(target, candidates)
        .map(str::to_string)
}

fn select_best<'a>(
    scored: impl Iterator<Item = (usize, &'a str, f64)>,
    threshold: f64,
) -> Option<MatchResult> {
    let mut best: Option<(usize, &str, f64)> = None;

    for (index, name, score) in scored {
        // 厳密に上回った場合のみ更新（同点は先勝ち）
        let improves = match best {
            Some((_, _, best_score)) => score > best_score,
            None => score > 0.0,
        };
        if improves {
            best = Some((index, name, score));
        }
    }

    best.filter(|(_, _, score)| *score > threshold)
        .map(|(index, name, score)| MatchResult {
            name: name.to_string(),
            index,
            score: score.min(1.0),
        })
}

fn rank_scored<'a>(
    scored: impl Iterator<Item = (usize, &'a str, f64)>,
    limit: usize,
) -> Vec<MatchResult> {
    let mut ranked: Vec<(usize, &str, f64)> = scored.filter(|(_, _, score)| *score > 0.0).collect();

    // 安定ソートなので同点は名簿順のまま
    ranked.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    ranked
        .into_iter()
        .take(limit)
        .map(|(index, name, score)| MatchResult {
            name: name.to_string(),
            index,
            score: score.min(1.0),
        })
        .collect()
}
