//! Read-only slice of the LuxuryAuthNFT registry ABI.
//!
//! Only view functions are declared; minting and brand management need a
//! signing key and are not part of this crate.

#![allow(missing_docs, clippy::pub_underscore_fields)]

use alloy_sol_types::sol;

sol! {
    function productToToken(string productHash) external view returns (uint256);
    function ownerOf(uint256 tokenId) external view returns (address);
    function tokenURI(uint256 tokenId) external view returns (string);
    function productExists(string productHash) external view returns (bool exists);
    function verifiedBrands(address brand) external view returns (bool);
    function owner() external view returns (address);
    function balanceOf(address account) external view returns (uint256);
    function tokenOfOwnerByIndex(address account, uint256 index) external view returns (uint256);
}
